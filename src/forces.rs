//! Pairwise force rule and the per-particle integrator.

use crate::particle::Particle;
use crate::rules::RuleSet;
use crate::world::World;
use life_common::{BoundaryPolicy, SimParams, Vec2};

/// Force exerted on a particle at `a` by a particle at `b` under coefficient `gravity`.
///
/// The scalar `gravity / d` scales the separation `a - b`, so positive gravity
/// pushes `a` away from `b` and negative gravity pulls it toward `b`.
/// Coincident particles and pairs farther apart than `cutoff` contribute nothing.
#[inline(always)]
pub fn pair_force(a: Vec2, b: Vec2, gravity: f64, cutoff: f64) -> Vec2 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    if dx == 0.0 && dy == 0.0 {
        return Vec2::zero();
    }
    let d = (dx * dx + dy * dy).sqrt();
    if d > cutoff {
        return Vec2::zero();
    }
    let f = gravity / d;
    Vec2::new(f * dx, f * dy)
}

/// Sum of `pair_force` over every source particle, in storage order.
#[inline]
pub fn rule_force(a: Vec2, sources: &[Particle], gravity: f64, cutoff: f64) -> Vec2 {
    let mut fx = 0.0;
    let mut fy = 0.0;
    for b in sources {
        let f = pair_force(a, b.position, gravity, cutoff);
        fx += f.x;
        fy += f.y;
    }
    Vec2::new(fx, fy)
}

/// Total force on `particle` from every rule targeting its group.
///
/// `world` must be the pre-step snapshot; accumulation order is rule order,
/// then source storage order, so the result never depends on scheduling.
pub fn net_force(particle: &Particle, rules: &RuleSet, world: &World, cutoff: f64) -> Vec2 {
    let mut total = Vec2::zero();
    for rule in rules.targeting(particle.group) {
        if let Some(source) = world.group(rule.source) {
            total = total + rule_force(particle.position, source.members(), rule.gravity, cutoff);
        }
    }
    total
}

/// Applies damping, moves the particle and handles the world edges.
pub fn integrate(particle: &Particle, force: Vec2, params: &SimParams) -> Particle {
    let mut vx = (particle.velocity.x + force.x) * params.damping;
    let mut vy = (particle.velocity.y + force.y) * params.damping;
    let mut x = particle.position.x + vx;
    let mut y = particle.position.y + vy;

    match params.boundary {
        BoundaryPolicy::Clamp => {
            let max_x = params.max_x();
            let max_y = params.max_y();
            if x <= 0.0 {
                x = 0.0;
                vx = -vx;
            } else if x >= max_x {
                x = max_x;
                vx = -vx;
            }
            if y <= 0.0 {
                y = 0.0;
                vy = -vy;
            } else if y >= max_y {
                y = max_y;
                vy = -vy;
            }
        }
        BoundaryPolicy::Reflect => {
            if x <= 0.0 || x >= params.max_x() {
                vx = -vx;
            }
            if y <= 0.0 || y >= params.max_y() {
                vy = -vy;
            }
        }
    }

    Particle {
        position: Vec2::new(x, y),
        velocity: Vec2::new(vx, vy),
        group: particle.group,
    }
}

/// Net force plus integration for one particle.
#[inline]
pub fn advance(particle: &Particle, rules: &RuleSet, world: &World, params: &SimParams) -> Particle {
    let force = net_force(particle, rules, world, params.interaction_radius);
    integrate(particle, force, params)
}
