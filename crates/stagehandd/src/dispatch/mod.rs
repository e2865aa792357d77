//! JSONL request dispatch onto registered capabilities.
//!
//! ## Protocol
//!
//! Clients send one request line whose `payload` is a JSON-encoded command
//! description:
//!
//! ```json
//! {"payload":"{\"type\":\"Stagehand.Prefab\",\"method\":\"AddComponent\",\"isMethod\":true,\"parameters\":[\"Assets/lamp.prefab\",\"Bulb/Light\"]}"}
//! ```
//!
//! The daemon answers with exactly one envelope line:
//!
//! ```json
//! {"status":{"code":"success","message":""}}
//! {"status":{"code":"error","message":"unknown capability: Nope"}}
//! ```
//!
//! ## Resolution
//!
//! The capability is looked up by exact name (falling back to the configured
//! default), the member by case-insensitive first match, and the textual
//! parameters are marshaled against the member's declared parameter kinds.

mod binding;
mod errors;
mod handler;
mod member;
mod registry;
mod request;
mod response;
mod router;

pub use self::binding::{Arguments, bind};
pub use self::errors::DispatchError;
pub use self::handler::DispatchConnectionHandler;
pub use self::member::{Capability, Member, Method, MethodFn, Parameter, Property, PropertyFn};
pub use self::registry::{CapabilityRegistry, RegistryError};
pub use self::request::{CommandDescription, InboundCommand};
pub use self::response::{ResponseEnvelope, ResponseWriter, Status, StatusCode, TypedValue};
pub use self::router::CommandRouter;
