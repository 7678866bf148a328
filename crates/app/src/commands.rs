//! Line-oriented terminal driver over [`Storefront`].

use std::io::{BufRead, Write};

use storefront_cart::CartStorage;
use storefront_catalog::Product;
use storefront_core::format_price;
use thiserror::Error;

use crate::storefront::Storefront;

const HELP: &str = "\
commands:
  search <query>      fuzzy search by name or SKU
  add <sku|#n>        add one unit (#n picks from the last search)
  remove <sku>        remove a line
  qty <sku> <n>       set a line's quantity (0 removes)
  clear               empty the cart
  sponsor <id>        set the distributor id
  cart                show the cart
  checkout            print the checkout URL
  help                show this text
  quit                exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Add(String),
    Remove(String),
    Quantity(String, i64),
    Clear,
    Sponsor(String),
    Cart,
    Checkout,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("not a quantity: {0}")]
    BadQuantity(String),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "search" | "s" => Self::Search(rest.to_string()),
            "add" | "a" => Self::Add(required(rest, "add <sku|#n>")?),
            "remove" | "rm" => Self::Remove(required(rest, "remove <sku>")?),
            "qty" => {
                let mut parts = rest.split_whitespace();
                let (Some(sku), Some(qty), None) = (parts.next(), parts.next(), parts.next()) else {
                    return Err(CommandError::Usage("qty <sku> <n>"));
                };
                let qty = qty
                    .parse::<i64>()
                    .map_err(|_| CommandError::BadQuantity(qty.to_string()))?;
                Self::Quantity(sku.to_string(), qty)
            }
            "clear" => Self::Clear,
            // Blank ids are passed through; the facade ignores them.
            "sponsor" => Self::Sponsor(rest.to_string()),
            "cart" => Self::Cart,
            "checkout" => Self::Checkout,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn required(rest: &str, usage: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(rest.to_string())
    }
}

/// Read commands from `input` until EOF or `quit`, writing responses to
/// `out`.
pub fn run<S, R, W>(shop: &mut Storefront<S>, input: R, mut out: W) -> anyhow::Result<()>
where
    S: CartStorage,
    R: BufRead,
    W: Write,
{
    let mut last_results: Vec<Product> = Vec::new();
    writeln!(out, "{} products loaded. Type `help` for commands.", shop.catalog().len())?;

    for line in input.lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Search(query) => {
                last_results = shop.search(&query);
                if last_results.is_empty() {
                    writeln!(out, "no results")?;
                }
                for (n, product) in last_results.iter().enumerate() {
                    writeln!(
                        out,
                        "#{:<3} {:<12} {:>9}  {}",
                        n + 1,
                        product.sku().as_str(),
                        format_price(product.price()),
                        product.name()
                    )?;
                }
            }
            Command::Add(target) => {
                let added = match pick(&last_results, &target) {
                    Some(product) => {
                        shop.add_product(product);
                        Some(product.name().to_string())
                    }
                    None if shop.add_to_cart(&target) => shop
                        .cart()
                        .line(&target)
                        .map(|line| line.name.clone()),
                    None => None,
                };
                match added {
                    Some(name) => writeln!(out, "added {name} ({} items)", shop.cart().total_items())?,
                    None => writeln!(out, "no product {target}")?,
                }
            }
            Command::Remove(sku) => {
                shop.remove_from_cart(&sku);
                write_cart(&mut out, shop)?;
            }
            Command::Quantity(sku, qty) => {
                shop.update_quantity(&sku, qty);
                write_cart(&mut out, shop)?;
            }
            Command::Clear => {
                shop.clear_cart();
                writeln!(out, "cart cleared")?;
            }
            Command::Sponsor(id) => {
                if shop.save_distributor_id(&id) {
                    writeln!(out, "distributor id set to {}", shop.cart().distributor_id())?;
                } else {
                    writeln!(out, "distributor id unchanged: {}", shop.cart().distributor_id())?;
                }
            }
            Command::Cart => write_cart(&mut out, shop)?,
            Command::Checkout => {
                let url = shop.checkout_url();
                if url.is_empty() {
                    writeln!(out, "cart is empty")?;
                } else {
                    writeln!(out, "{url}")?;
                }
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => break,
        }
    }

    out.flush()?;
    Ok(())
}

/// `#n` refers to the n-th entry of the last search.
fn pick<'a>(results: &'a [Product], target: &str) -> Option<&'a Product> {
    let n: usize = target.strip_prefix('#')?.parse().ok()?;
    results.get(n.checked_sub(1)?)
}

fn write_cart<S: CartStorage, W: Write>(out: &mut W, shop: &Storefront<S>) -> std::io::Result<()> {
    let cart = shop.cart();
    if cart.is_empty() {
        return writeln!(out, "cart is empty (distributor {})", cart.distributor_id());
    }
    for line in cart.lines() {
        writeln!(
            out,
            "{:>4} x {:<12} {:>9}  {}",
            line.quantity,
            line.sku.as_str(),
            format_price(line.subtotal()),
            line.name
        )?;
    }
    writeln!(
        out,
        "{} items, total {} (distributor {})",
        cart.total_items(),
        format_price(cart.total_price()),
        cart.distributor_id()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("  "), Ok(None));
        assert_eq!(
            Command::parse("search  tangy  tangerine "),
            Ok(Some(Command::Search("tangy  tangerine".into())))
        );
        assert_eq!(Command::parse("ADD BTT-2"), Ok(Some(Command::Add("BTT-2".into()))));
        assert_eq!(
            Command::parse("qty BTT-2 -1"),
            Ok(Some(Command::Quantity("BTT-2".into(), -1)))
        );
        assert_eq!(Command::parse("quit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Command::parse("add"), Err(CommandError::Usage("add <sku|#n>")));
        assert_eq!(Command::parse("qty X9"), Err(CommandError::Usage("qty <sku> <n>")));
        assert_eq!(
            Command::parse("qty X9 lots"),
            Err(CommandError::BadQuantity("lots".into()))
        );
        assert_eq!(
            Command::parse("dance"),
            Err(CommandError::Unknown("dance".into()))
        );
    }

    #[test]
    fn picks_from_last_results() {
        let results = vec![Product::new(
            "Widget",
            storefront_core::Sku::new("X9").unwrap(),
            9.99,
        )
        .unwrap()];
        assert_eq!(pick(&results, "#1").map(|p| p.sku().as_str()), Some("X9"));
        assert!(pick(&results, "#0").is_none());
        assert!(pick(&results, "#2").is_none());
        assert!(pick(&results, "X9").is_none());
    }
}
