//! Request and response shapes for the remote resources
//!
//! These mirror the server's published schema. They are plain serde structs;
//! the client tiers only reference them.

pub mod list;
pub mod profile;
pub mod widget;

pub use list::Page;
pub use profile::{
    ConfirmPublish, CreateProfile, Profile, ProfileStatus, PublishToken, UpdateProfile,
};
pub use widget::{CreateWidget, ListWidgetsQuery, UpdateWidget, Widget};
