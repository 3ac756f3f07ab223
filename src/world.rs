use crate::particle::{GroupId, Particle, ParticleGroup, ParticleRef};
use anyhow::Result;
use life_common::{DrawInstruction, GroupConfig, SimParams};
use log::debug;
use rand::Rng;
use std::collections::HashMap;

/// Owns every particle group, indexed by `GroupId`.
///
/// Groups are appended once at setup and never removed or resized.
#[derive(Debug, Clone, Default)]
pub struct World {
    groups: Vec<ParticleGroup>,
    names: HashMap<String, GroupId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one group per config entry, in order, at random positions.
    pub fn populate<R: Rng>(
        group_configs: &[GroupConfig],
        params: &SimParams,
        rng: &mut R,
    ) -> Result<Self> {
        let mut world = World::new();
        for gc in group_configs {
            let id = GroupId(world.groups.len());
            let group = ParticleGroup::create(id, &gc.name, &gc.color, gc.count as usize, params, rng)?;
            debug!("Created group '{}' ({}) with {} particles.", gc.name, gc.color, gc.count);
            world.insert(group)?;
        }
        Ok(world)
    }

    /// Adds a fully built group. Its id must be the next free index.
    pub fn insert(&mut self, group: ParticleGroup) -> Result<GroupId> {
        let id = GroupId(self.groups.len());
        if group.id != id {
            anyhow::bail!("group '{}' has id {:?}, expected {:?}.", group.name, group.id, id);
        }
        if self.names.contains_key(&group.name) {
            anyhow::bail!("duplicate group name '{}'.", group.name);
        }
        self.names.insert(group.name.clone(), id);
        self.groups.push(group);
        Ok(id)
    }

    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.names.get(name).copied()
    }

    pub fn group(&self, id: GroupId) -> Option<&ParticleGroup> {
        self.groups.get(id.index())
    }

    pub fn groups(&self) -> &[ParticleGroup] {
        &self.groups
    }

    pub(crate) fn groups_mut(&mut self) -> &mut [ParticleGroup] {
        &mut self.groups
    }

    pub fn particle(&self, r: ParticleRef) -> Option<&Particle> {
        self.group(r.group).and_then(|g| g.members().get(r.index))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn particle_count(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    /// One draw instruction per particle, groups in creation order.
    pub fn draw_list(&self, particle_size: f64) -> Vec<DrawInstruction> {
        let mut list = Vec::with_capacity(self.particle_count());
        for group in &self.groups {
            list.extend(group.members().iter().map(|p| DrawInstruction {
                x: p.position.x,
                y: p.position.y,
                color: group.color.clone(),
                size: particle_size,
            }));
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_common::{BoundaryPolicy, Vec2, DAMPING, INTERACTION_RADIUS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> SimParams {
        SimParams {
            world_width: 500.0,
            world_height: 500.0,
            padding: 10.0,
            particle_size: 2.0,
            boundary: BoundaryPolicy::Clamp,
            interaction_radius: INTERACTION_RADIUS,
            damping: DAMPING,
        }
    }

    fn group_config(name: &str, color: &str, count: u32) -> GroupConfig {
        GroupConfig { name: name.to_string(), color: color.to_string(), count }
    }

    #[test]
    fn populate_assigns_ids_in_order() {
        let configs = [group_config("a", "#A00", 3), group_config("b", "#0B0", 0), group_config("c", "#00C", 5)];
        let world = World::populate(&configs, &params(), &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(world.group_count(), 3);
        assert_eq!(world.particle_count(), 8);
        assert_eq!(world.group_id("c"), Some(GroupId(2)));
        assert_eq!(world.group_id("missing"), None);
        assert!(world.group(GroupId(1)).unwrap().is_empty());
    }

    #[test]
    fn particle_ref_resolves_across_groups() {
        let configs = [group_config("a", "#A00", 2), group_config("b", "#0B0", 4)];
        let world = World::populate(&configs, &params(), &mut StdRng::seed_from_u64(4)).unwrap();
        let r = ParticleRef { group: GroupId(1), index: 3 };
        assert_eq!(world.particle(r), world.groups()[1].members().get(3));
        assert!(world.particle(ParticleRef { group: GroupId(1), index: 4 }).is_none());
        assert!(world.particle(ParticleRef { group: GroupId(7), index: 0 }).is_none());
    }

    #[test]
    fn insert_rejects_duplicate_names() {
        let mut world = World::new();
        world.insert(ParticleGroup::from_particles(GroupId(0), "a", "#fff", Vec::new())).unwrap();
        let err = world
            .insert(ParticleGroup::from_particles(GroupId(1), "a", "#000", Vec::new()))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn draw_list_carries_group_colors() {
        let mut world = World::new();
        let p = Particle::at_rest(Vec2::new(4.0, 5.0), GroupId(0));
        world.insert(ParticleGroup::from_particles(GroupId(0), "a", "#123456", [p])).unwrap();
        let list = world.draw_list(3.0);
        assert_eq!(
            list,
            vec![DrawInstruction { x: 4.0, y: 5.0, color: "#123456".to_string(), size: 3.0 }]
        );
    }
}
