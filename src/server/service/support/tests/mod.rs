
use chamados_test_utils::prelude::*;

use super::*;
