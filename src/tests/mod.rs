use super::*;

mod parsing_and_selectors;
