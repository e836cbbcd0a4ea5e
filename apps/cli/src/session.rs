//! # Scan Session
//!
//! The interactive checkout counter. A barcode scanner in keyboard mode
//! types a code followed by Enter, so every plain line is a scan.
//!
//! ## Input Grammar
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  8934588012345        scan: add one unit, or report an unknown code     │
//! │  :cart                show the cart                                     │
//! │  :qty <code> <n>      set the quantity (0 removes the line)             │
//! │  :inc <code>          one more                                          │
//! │  :dec <code>          one less                                          │
//! │  :rm <code>           remove the line                                   │
//! │  :checkout            store the invoice, print the receipt              │
//! │  :cancel              empty the cart                                    │
//! │  :help                this list                                         │
//! │  :quit                leave (end of input does the same)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session owns the only [`Cart`]. A failed command prints its error
//! and the session carries on with the cart as it was.

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::commands::{self, ScanOutcome};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::render;
use scanpos_core::cart::Cart;
use scanpos_db::KeyValueStore;

const PROMPT: &str = "scan> ";

const HELP: &str = "\
<code>            scan a product
:cart             show the cart
:qty <code> <n>   set quantity (0 removes)
:inc <code>       add one
:dec <code>       remove one
:rm <code>        remove the line
:checkout         finish the sale
:cancel           empty the cart
:help             show this help
:quit             leave the session";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Blank,
    Scan(String),
    ShowCart,
    SetQuantity { id: String, quantity: i64 },
    Increment(String),
    Decrement(String),
    Remove(String),
    Checkout,
    Cancel,
    Help,
    Quit,
}

/// What the loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    Quit(String),
}

/// Parses one input line.
pub fn parse_line(line: &str) -> Result<SessionCommand, ApiError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(SessionCommand::Blank);
    }

    let Some(rest) = line.strip_prefix(':') else {
        return Ok(SessionCommand::Scan(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or("");
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("cart", []) => SessionCommand::ShowCart,
        ("qty", [id, n]) => SessionCommand::SetQuantity {
            id: id.to_string(),
            quantity: n
                .parse()
                .map_err(|_| ApiError::validation(format!("'{n}' is not a quantity")))?,
        },
        ("inc", [id]) => SessionCommand::Increment(id.to_string()),
        ("dec", [id]) => SessionCommand::Decrement(id.to_string()),
        ("rm", [id]) => SessionCommand::Remove(id.to_string()),
        ("checkout", []) => SessionCommand::Checkout,
        ("cancel", []) => SessionCommand::Cancel,
        ("help", []) => SessionCommand::Help,
        ("quit" | "q" | "exit", []) => SessionCommand::Quit,
        ("qty" | "inc" | "dec" | "rm" | "cart" | "checkout" | "cancel" | "help" | "quit", _) => {
            return Err(ApiError::validation(format!(
                "Wrong arguments for :{name}, see :help"
            )))
        }
        _ => return Err(ApiError::validation(format!("Unknown command :{name}, see :help"))),
    };

    Ok(command)
}

/// An open sale at the counter.
pub struct Session<S> {
    store: S,
    config: AppConfig,
    cart: Cart,
}

impl<S: KeyValueStore + Clone> Session<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        Session {
            store,
            config,
            cart: Cart::new(),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Runs one input line against the cart and returns the text to show.
    pub async fn handle_line(&mut self, line: &str) -> Result<Step, ApiError> {
        let command = parse_line(line)?;
        debug!(?command, "Session input");

        let text = match command {
            SessionCommand::Blank => String::new(),
            SessionCommand::Scan(code) => {
                match commands::scan_code(&self.store, &mut self.cart, &code).await? {
                    ScanOutcome::Added(line) => format!(
                        "+ {} x{}  {}  [{} in cart]",
                        line.product.name,
                        line.quantity,
                        self.total_text(),
                        self.cart.total_quantity()
                    ),
                    ScanOutcome::Unknown(code) => format!(
                        "Unknown code {code}. Add it with: scanpos product add {code} --name <name> --price <price> --cost <cost>"
                    ),
                }
            }
            SessionCommand::ShowCart => render::cart_table(&self.config, &self.cart),
            SessionCommand::SetQuantity { id, quantity } => {
                commands::update_quantity(&mut self.cart, &id, quantity)?;
                render::cart_table(&self.config, &self.cart)
            }
            SessionCommand::Increment(id) => {
                commands::increment(&mut self.cart, &id)?;
                render::cart_table(&self.config, &self.cart)
            }
            SessionCommand::Decrement(id) => {
                commands::decrement(&mut self.cart, &id)?;
                render::cart_table(&self.config, &self.cart)
            }
            SessionCommand::Remove(id) => {
                commands::remove_from_cart(&mut self.cart, &id)?;
                render::cart_table(&self.config, &self.cart)
            }
            SessionCommand::Checkout => {
                let invoice = commands::checkout(&self.store, &mut self.cart).await?;
                render::receipt(&self.config, &invoice)
            }
            SessionCommand::Cancel => {
                commands::cancel(&mut self.cart);
                "Sale cancelled.".to_string()
            }
            SessionCommand::Help => HELP.to_string(),
            SessionCommand::Quit => return Ok(Step::Quit(self.farewell())),
        };

        Ok(Step::Continue(text))
    }

    /// Reads lines until `:quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<(), ApiError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        info!(store = %self.config.store_name, "Session started");
        writeln!(out, "{} ready. Scan a code or type :help.", self.config.store_name)?;

        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                writeln!(out, "{}", self.farewell())?;
                break;
            };

            match self.handle_line(&line).await {
                Ok(Step::Continue(text)) if text.is_empty() => {}
                Ok(Step::Continue(text)) => writeln!(out, "{text}")?,
                Ok(Step::Quit(text)) => {
                    writeln!(out, "{text}")?;
                    break;
                }
                Err(err) => writeln!(out, "error: {}", err.message)?,
            }
        }

        info!(open_lines = self.cart.item_count(), "Session ended");
        Ok(())
    }

    fn total_text(&self) -> String {
        match self.cart.total() {
            Some(total) => format!("total {}", self.config.format_currency(total)),
            None => "total overflow".to_string(),
        }
    }

    fn farewell(&self) -> String {
        if self.cart.is_empty() {
            "Bye.".to_string()
        } else {
            format!(
                "Bye. {} unsold item(s) discarded.",
                self.cart.total_quantity()
            )
        }
    }
}
