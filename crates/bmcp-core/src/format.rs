//! Plain-text instance format.
//!
//! Whitespace separated integers; lines starting with `#` are comments:
//!
//! ```text
//! m n C
//! w_0 .. w_{m-1}        item weights
//! p_0 .. p_{n-1}        element profits
//! m rows of n flags     row i, column e is 1 iff item i covers element e
//! ```
//!
//! # Examples
//!
//! ```
//! use bmcp_core::format::parse_instance;
//!
//! let instance = parse_instance("
//!     ## three items, two elements
//!     3 2 5
//!     2 3 4
//!     5 5
//!     1 0
//!     1 1
//!     0 1
//! ").unwrap();
//!
//! assert_eq!(instance.capacity(), 5);
//! assert_eq!(instance.item_neighbors(1), &[0, 1]);
//! ```

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{BmcpError, Result};
use crate::instance::{Instance, InstanceBuilder};

/// Reads an instance file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<Instance> {
    let contents = std::fs::read_to_string(path)?;
    parse_instance(&contents)
}

/// Parses an instance from its textual form.
pub fn parse_instance(input: &str) -> Result<Instance> {
    let mut tokens = Tokens::new(input);

    let m = tokens.next_count("item count")?;
    let n = tokens.next_count("element count")?;
    let capacity = tokens.next_int("capacity")?;

    let mut builder = InstanceBuilder::new(capacity);
    for _ in 0..m {
        builder.add_item(tokens.next_int("item weight")?);
    }
    for _ in 0..n {
        builder.add_element(tokens.next_int("element profit")?);
    }
    for item in 0..m {
        for element in 0..n {
            let (line, flag) = tokens.next_int_with_line("relation flag")?;
            match flag {
                0 => {}
                1 => {
                    builder.cover(item, element);
                }
                value => return Err(BmcpError::InvalidFlag { line, value }),
            }
        }
    }
    if let Some((line, token)) = tokens.next() {
        return Err(BmcpError::TrailingData {
            line,
            token: token.to_string(),
        });
    }

    builder.build()
}

/// Renders an instance in the format accepted by [`parse_instance`].
pub fn format_instance(instance: &Instance) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {}",
        instance.item_count(),
        instance.element_count(),
        instance.capacity()
    );
    let weights: Vec<String> = instance
        .items()
        .map(|i| instance.weight(i).to_string())
        .collect();
    let _ = writeln!(out, "{}", weights.join(" "));
    let profits: Vec<String> = instance
        .elements()
        .map(|e| instance.profit(e).to_string())
        .collect();
    let _ = writeln!(out, "{}", profits.join(" "));
    for item in instance.items() {
        let mut row = vec!["0"; instance.element_count()];
        for &element in instance.item_neighbors(item) {
            row[element] = "1";
        }
        let _ = writeln!(out, "{}", row.join(" "));
    }
    out
}

struct Tokens<'a> {
    tokens: std::vec::IntoIter<(usize, &'a str)>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        let tokens: Vec<(usize, &str)> = input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim_start().starts_with('#'))
            .flat_map(|(idx, line)| line.split_whitespace().map(move |tok| (idx + 1, tok)))
            .collect();
        Self {
            tokens: tokens.into_iter(),
        }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        self.tokens.next()
    }

    fn next_int_with_line(&mut self, expected: &'static str) -> Result<(usize, i64)> {
        let (line, token) = self
            .next()
            .ok_or(BmcpError::UnexpectedEof { expected })?;
        let value = token.parse::<i64>().map_err(|_| BmcpError::Parse {
            line,
            expected,
            token: token.to_string(),
        })?;
        Ok((line, value))
    }

    fn next_int(&mut self, expected: &'static str) -> Result<i64> {
        self.next_int_with_line(expected).map(|(_, v)| v)
    }

    fn next_count(&mut self, expected: &'static str) -> Result<usize> {
        let (line, token) = self
            .next()
            .ok_or(BmcpError::UnexpectedEof { expected })?;
        token.parse::<usize>().map_err(|_| BmcpError::Parse {
            line,
            expected,
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
