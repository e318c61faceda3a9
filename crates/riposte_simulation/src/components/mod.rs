//! ECS Components для боевых entity
//!
//! - actor: базовые характеристики (Actor, Health)
//!
//! Combat/combo компоненты живут рядом со своими системами
//! (`combat::Attacker`, `combo::ComboController`).

pub mod actor;

pub use actor::*;
