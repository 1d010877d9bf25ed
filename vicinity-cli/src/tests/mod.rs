//! Shared test harness modules for the vicinity CLI.

use super::*;
