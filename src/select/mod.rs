//! Select module
//!
//! Projection of responses into the values handed to the caller.
//!
//! # Expressions
//!
//! | Expression   | Result                                  |
//! |--------------|-----------------------------------------|
//! | `*`          | every response, whole                   |
//! | `Queues`     | the `Queues` field of every response    |
//! | `Meta.Count` | a nested field of every response        |
//! | `^InstanceId`| the bound `InstanceId` input, once      |

mod projector;

pub use projector::{FnProjector, ResponseProjector, SelectExpr};
