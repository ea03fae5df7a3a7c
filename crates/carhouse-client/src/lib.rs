//! Typed facade over the hosted backend-as-a-service.
//!
//! The backend owns authentication, persistence and file storage; this
//! crate is the only way the admin panel talks to it. One explicitly
//! constructed [`Backend`] instance is injected into the server at startup
//! — no global client, no module-level state.
//!
//! Surface, one file per resource family:
//! - [`session`] — current session, login/logout, registration
//! - [`catalog`] — product and category CRUD, product images
//! - [`orders`] — order listing, status updates, store statistics
//! - [`users`] — user listing, partial updates, admin membership
//! - [`storage`] — file upload to the object store
//!
//! Reads get a per-request timeout and exactly one retry on transient
//! transport failures. Writes are issued exactly once, never retried, and
//! surface the backend's error message verbatim.

mod backend;
mod catalog;
mod config;
mod model;
mod orders;
mod session;
mod storage;
mod users;

pub use backend::Backend;
pub use config::BackendConfig;
pub use model::{
    Category, CategoryInput, Order, OrderItem, Product, ProductImage, ProductInput,
    RegisterInput, Session, SessionUser, Statistics, User, UserPatch,
};
