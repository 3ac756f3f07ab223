use anyhow::Result;
use life_common::{SimParams, Vec2};
use rand::distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Index of a group inside its `World`, assigned in creation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub usize);

impl GroupId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable reference to one particle: owning group plus position in that group's storage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ParticleRef {
    pub group: GroupId,
    pub index: usize,
}

/// A single point mass.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    /// Persists across steps; damped every step, never reset.
    pub velocity: Vec2,
    pub group: GroupId,
}

impl Particle {
    pub fn at_rest(position: Vec2, group: GroupId) -> Self {
        Self { position, velocity: Vec2::zero(), group }
    }
}

/// A fixed-size collection of particles sharing a colour and a set of rules.
///
/// Storage is allocated once in [`ParticleGroup::create`] and never resized,
/// so a [`ParticleRef`] into it stays valid for the whole run.
#[derive(Debug, Clone)]
pub struct ParticleGroup {
    pub id: GroupId,
    pub name: String,
    /// Opaque display attribute, irrelevant to physics.
    pub color: String,
    pub(crate) members: Box<[Particle]>,
}

impl ParticleGroup {
    /// Spawns `count` particles uniformly inside the padded interior of the world, at rest.
    ///
    /// Positions fall in `[padding, width - padding) x [padding, height - padding)`.
    /// This is the only place the engine consumes randomness.
    pub fn create<R: Rng>(
        id: GroupId,
        name: impl Into<String>,
        color: impl Into<String>,
        count: usize,
        params: &SimParams,
        rng: &mut R,
    ) -> Result<Self> {
        let dist_x = Uniform::new(params.padding, params.world_width - params.padding)?;
        let dist_y = Uniform::new(params.padding, params.world_height - params.padding)?;

        let members: Box<[Particle]> = (0..count)
            .map(|_| {
                let x = rng.sample(&dist_x);
                let y = rng.sample(&dist_y);
                Particle::at_rest(Vec2::new(x, y), id)
            })
            .collect();

        Ok(Self {
            id,
            name: name.into(),
            color: color.into(),
            members,
        })
    }

    /// Builds a group from explicit particles, retagging them with `id`.
    pub fn from_particles(
        id: GroupId,
        name: impl Into<String>,
        color: impl Into<String>,
        particles: impl IntoIterator<Item = Particle>,
    ) -> Self {
        let members = particles
            .into_iter()
            .map(|p| Particle { group: id, ..p })
            .collect();
        Self {
            id,
            name: name.into(),
            color: color.into(),
            members,
        }
    }

    #[inline(always)]
    pub fn members(&self) -> &[Particle] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
