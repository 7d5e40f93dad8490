mod credits;
mod redeem;

use chamados_test_utils::prelude::*;

use super::*;
