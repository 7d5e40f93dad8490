//! Handler level tests, calling each controller with a session from the test context.

mod auth;
mod checklist;
mod ticket;
mod truepush;

use chamados_test_utils::prelude::*;

use crate::util::TestContextExt;
