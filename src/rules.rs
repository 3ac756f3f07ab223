use crate::particle::GroupId;
use crate::world::World;
use anyhow::Result;
use life_common::RuleConfig;
use log::debug;

/// Directional force contribution from every `source` particle onto every `target`
/// particle within the interaction radius. Negative gravity pulls targets toward
/// sources, positive gravity pushes them away.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InteractionRule {
    pub source: GroupId,
    pub target: GroupId,
    pub gravity: f64,
}

/// Ordered, immutable list of rules plus a per-target index into it.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<InteractionRule>,
    // by_target[g] = indices into `rules` whose target is group g, in rule order
    by_target: Vec<Vec<usize>>,
}

impl RuleSet {
    /// Builds a rule set over `group_count` groups. Every id must be below `group_count`.
    pub fn new(rules: Vec<InteractionRule>, group_count: usize) -> Result<Self> {
        let mut by_target = vec![Vec::new(); group_count];
        for (i, rule) in rules.iter().enumerate() {
            if rule.source.index() >= group_count || rule.target.index() >= group_count {
                anyhow::bail!(
                    "rule #{} references group {:?} -> {:?}, but only {} groups exist.",
                    i, rule.source, rule.target, group_count
                );
            }
            if !rule.gravity.is_finite() {
                anyhow::bail!("rule #{} has a non-finite gravity coefficient.", i);
            }
            by_target[rule.target.index()].push(i);
        }
        Ok(Self { rules, by_target })
    }

    /// Resolves name-based rules against the groups of `world`.
    /// A rule naming an unknown group is a setup error.
    pub fn resolve(world: &World, configs: &[RuleConfig]) -> Result<Self> {
        let mut rules = Vec::with_capacity(configs.len());
        for rc in configs {
            let source = world
                .group_id(&rc.source)
                .ok_or_else(|| anyhow::anyhow!("rule source '{}' is not a known group.", rc.source))?;
            let target = world
                .group_id(&rc.target)
                .ok_or_else(|| anyhow::anyhow!("rule target '{}' is not a known group.", rc.target))?;
            debug!("Rule: {} -> {} (g = {})", rc.source, rc.target, rc.gravity);
            rules.push(InteractionRule { source, target, gravity: rc.gravity });
        }
        Self::new(rules, world.group_count())
    }

    /// Rules whose target is `group`, in rule-list order.
    pub fn targeting(&self, group: GroupId) -> impl Iterator<Item = &InteractionRule> + '_ {
        self.by_target
            .get(group.index())
            .into_iter()
            .flatten()
            .map(move |&i| &self.rules[i])
    }

    pub fn rules(&self) -> &[InteractionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleGroup;

    fn world(names: &[&str]) -> World {
        let mut world = World::new();
        for (i, name) in names.iter().enumerate() {
            world
                .insert(ParticleGroup::from_particles(GroupId(i), *name, "#fff", Vec::new()))
                .unwrap();
        }
        world
    }

    fn rc(source: &str, target: &str, gravity: f64) -> RuleConfig {
        RuleConfig { source: source.to_string(), target: target.to_string(), gravity }
    }

    #[test]
    fn targeting_keeps_rule_order() {
        let world = world(&["yellow", "red", "green"]);
        let rules = RuleSet::resolve(
            &world,
            &[
                rc("green", "green", -0.32),
                rc("red", "green", -0.17),
                rc("red", "red", -0.1),
                rc("yellow", "green", 0.34),
            ],
        )
        .unwrap();

        let green: Vec<f64> = rules.targeting(GroupId(2)).map(|r| r.gravity).collect();
        assert_eq!(green, vec![-0.32, -0.17, 0.34]);
        assert_eq!(rules.targeting(GroupId(1)).count(), 1);
        assert_eq!(rules.len(), 4);
    }

    #[test]
    fn group_without_rules_has_no_targeting_entries() {
        let world = world(&["a", "b"]);
        let rules = RuleSet::resolve(&world, &[rc("a", "a", 1.0)]).unwrap();
        assert_eq!(rules.targeting(GroupId(1)).count(), 0);
        assert_eq!(rules.targeting(GroupId(42)).count(), 0);
    }

    #[test]
    fn unknown_group_fails_fast() {
        let world = world(&["a"]);
        let err = RuleSet::resolve(&world, &[rc("a", "ghost", 0.5)]).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        let rule = InteractionRule { source: GroupId(0), target: GroupId(3), gravity: 1.0 };
        assert!(RuleSet::new(vec![rule], 2).is_err());
    }

    #[test]
    fn non_finite_gravity_is_rejected() {
        let rule = InteractionRule { source: GroupId(0), target: GroupId(0), gravity: f64::NAN };
        assert!(RuleSet::new(vec![rule], 1).is_err());
    }
}
