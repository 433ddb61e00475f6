//! Shared test harness modules for the hubmatch CLI.

use super::*;

mod helpers;
