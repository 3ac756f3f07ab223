//! Particle-life engine: coloured particle groups attracting and repelling each
//! other under pairwise rules, stepped in parallel with rayon.
//!
//! A render loop owns a [`LifeSimulation`], calls [`LifeSimulation::step`] once
//! per frame and then draws [`LifeSimulation::draw_list`].

pub mod cpu_state;
pub mod forces;
pub mod output;
pub mod particle;
pub mod rules;
pub mod simulation;
pub mod world;

pub use particle::{GroupId, Particle, ParticleGroup, ParticleRef};
pub use rules::{InteractionRule, RuleSet};
pub use simulation::LifeSimulation;
pub use world::World;
