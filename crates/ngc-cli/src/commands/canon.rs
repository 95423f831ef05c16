//! `ngcpy canon`: print the bound canon catalogue

use colored::*;
use ngc_python::canon::{BOUND, OMITTED};

pub fn handle_canon(filter: Option<&str>, omitted: bool) {
    let matches = |name: &str| {
        filter.map_or(true, |f| name.to_ascii_uppercase().contains(&f.to_ascii_uppercase()))
    };

    if omitted {
        for name in OMITTED.iter().filter(|&&name| matches(name)) {
            println!("{}", name.dimmed());
        }
        return;
    }

    for spec in BOUND.iter().filter(|spec| matches(spec.name)) {
        println!("{}", spec);
    }
}
