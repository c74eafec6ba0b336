use crate::entities::position::Position;
use crate::normalize::first_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Ticker shown when no symbol can be resolved.
pub const PLACEHOLDER_SYMBOL: &str = "TOKEN";

const NAME_KEYS: [&str; 3] = ["symbol", "ticker", "name"];
const ADDRESS_KEYS: [&str; 3] = ["address", "token_address", "tokenAddress"];

/// Base-chain tokens known without configuration.
pub const BASE_TOKENS: [(&str, &str); 2] = [
    ("0x4200000000000000000000000000000000000006", "WETH"),
    ("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913", "USDC"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSlot {
    Token0,
    Token1,
}

impl TokenSlot {
    pub fn index(self) -> usize {
        match self {
            Self::Token0 => 0,
            Self::Token1 => 1,
        }
    }
}

/// Contract address to ticker mapping. Keys are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: HashMap<String, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table preloaded with [`BASE_TOKENS`].
    pub fn with_base_tokens() -> Self {
        let mut table = Self::new();
        for (address, symbol) in BASE_TOKENS {
            table.insert(address, symbol);
        }
        table
    }

    pub fn insert(&mut self, address: impl AsRef<str>, symbol: impl Into<String>) {
        self.symbols
            .insert(address.as_ref().trim().to_lowercase(), symbol.into());
    }

    pub fn lookup(&self, address: &str) -> Option<&str> {
        self.symbols
            .get(&address.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Resolves the display ticker for one of a position's tokens.
    ///
    /// Tries the slot's own reference first (inline name, then address
    /// lookup), then the positional `tokens` list, then falls back to
    /// [`PLACEHOLDER_SYMBOL`].
    pub fn resolve(&self, position: &Position, slot: TokenSlot) -> String {
        let reference = match slot {
            TokenSlot::Token0 => &position.token0,
            TokenSlot::Token1 => &position.token1,
        };
        let positional = if position.tokens.len() >= 2 {
            position.tokens.get(slot.index())
        } else {
            None
        };

        self.resolve_reference(reference)
            .or_else(|| positional.and_then(|t| self.resolve_reference(t)))
            .unwrap_or(PLACEHOLDER_SYMBOL)
            .to_string()
    }

    fn resolve_reference<'a>(&'a self, reference: &'a Value) -> Option<&'a str> {
        match reference {
            Value::Object(_) => first_text(reference, &NAME_KEYS).or_else(|| {
                first_text(reference, &ADDRESS_KEYS).and_then(|addr| self.lookup(addr))
            }),
            Value::String(address) => self.lookup(address),
            _ => None,
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (address, symbol) in iter {
            table.insert(address, symbol);
        }
        table
    }
}
