#![cfg_attr(docsrs, feature(doc_cfg))]
//! Third-person character control with soft-lock target focusing.
//!
//! The focus core ([`focus`], [`targeting`], [`rotation`], [`sweep`]) is plain
//! Rust over small collaborator traits. [`plugin`] binds it to Bevy and
//! [`input`] maps devices onto its events.
pub mod constants;
pub mod focus;
pub mod input;
pub mod logging;
pub mod movement;
pub mod plugin;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
pub mod rotation;
pub mod settings;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod spawn_world;
pub mod sweep;
pub mod targeting;
#[cfg(feature = "test-support")]
pub mod test_support;
pub use constants::*;

// Re-export commonly used items
pub use focus::{
    DisengageReason, FocusController, FocusState, FocusUpdate, FocusWorld, OrientationMode,
    Transition,
};
pub use input::InputMappingPlugin;
pub use logging::init as init_logging;
pub use plugin::{
    Collider, ControlRotation, CycleFocusTarget, Focus, FocusCamera, FocusChanged, FocusPlugin,
    FocusSystems, LookInput, MoveInput, PlayerCharacter, ToggleFocus,
};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::PresentationPlugin;
pub use rotation::ViewRotation;
pub use settings::{CharacterSettings, FocusSettings, GameSettings, SettingsError};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use spawn_world::spawn_world_system;
pub use sweep::{Body, BodySet};
pub use targeting::{
    AcquisitionError, AgentId, BoxSweep, CandidateOrder, CandidateSet, CollisionCategory,
    SpatialQuery, SweepHit, ViewPoint,
};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use soulslike::prelude::*;
    //! ```

    pub use crate::focus::{FocusController, FocusWorld};
    pub use crate::rotation::ViewRotation;
    pub use crate::settings::FocusSettings;
    pub use crate::sweep::{Body, BodySet};
    pub use crate::targeting::{AgentId, SpatialQuery, ViewPoint};
    pub use crate::FocusPlugin;
}
