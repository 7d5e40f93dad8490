mod controller;
mod router;
mod util;
