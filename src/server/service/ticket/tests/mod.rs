mod assume;
mod create_ticket;
mod update_status;
mod webhook;

use chamados_test_utils::prelude::*;

use super::*;
