//! Page enhancer core: pure state machine over an arena document.
//!
//! Hosts feed page events in as [`Msg`] values and carry out the returned [`Effect`]s
//! (observers, timers, fetches, submissions). All DOM mutation happens inside [`update`].
mod config;
mod dom;
mod effect;
mod fragment;
mod lazy;
mod msg;
mod pager;
mod responsive;
mod search;
mod state;
mod styles;
mod sweep;
mod table;
mod update;
mod urls;
mod view_model;

pub use config::EnhancerConfig;
pub use dom::{Document, Element, NodeId, NodeKind};
pub use effect::{Effect, FragmentScope, RequestId, TimerId};
pub use fragment::{Fragment, FragmentNode};
pub use msg::{FetchFailure, Key, Msg};
pub use responsive::SizeTier;
pub use state::EnhancerState;
pub use table::{visible_window, SortDirection};
pub use update::update;
pub use view_model::EnhancerViewModel;

pub(crate) use update::rearm;
