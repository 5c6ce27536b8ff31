//! # INI Config
//!
//! An INI reader and writer with ordered sections, typed values and optional
//! comment preservation.
//!
//! ## Overview
//!
//! Text flows through a small pipeline:
//!
//! 1. [`Tokenizer`] turns raw text into tokens, tracking line and column
//! 2. [`IniParser`] consumes the tokens once and builds a [`Config`] plus a
//!    [`CommentStore`]
//! 3. [`ConfigParser`] exposes the model for typed reads and writes
//! 4. [`Writer`] renders the model back to text
//!
//! Values are inferred from their text: `7790` becomes [`Value::Int`],
//! `2.5` a [`Value::Float`], `yes` a [`Value::Bool`]. Quoted values always
//! stay strings.
//!
//! ## Key Features
//!
//! - **Ordered model**: sections and options keep their insertion order
//! - **Typed access**: `get::<T>` converts through a fixed coercion table
//! - **Comment preservation**: header, section, option and inline comments
//!   survive a read/write cycle when enabled
//! - **Serde integration**: deserialize a document into your own structs
//! - **Atomic saves**: files are replaced through a temporary sibling
//!
//! ## Basic Usage
//!
//! ```rust
//! use ini_config::ConfigParser;
//!
//! let text = "[URL]\nName=Player\nHost=\nPort=7790\n";
//! let parser: ConfigParser = text.parse()?;
//!
//! assert_eq!(parser.get_string("URL", "Name")?, "Player");
//! assert_eq!(parser.get_string("URL", "Host")?, "");
//! assert_eq!(parser.get_int("URL", "Port")?, 7790);
//! # Ok::<(), ini_config::IniError>(())
//! ```
//!
//! ## Writing
//!
//! ```rust
//! use ini_config::{AssignmentCharacter, ConfigParser, ParserOptions};
//!
//! let options = ParserOptions::new()
//!     .with_assignment_character(AssignmentCharacter::Colon)
//!     .with_boolean_format("yes", "no");
//! let mut parser = ConfigParser::with_options(options);
//!
//! parser.add_section("server")?;
//! parser.set("server", "port", 8080)?;
//! parser.set("server", "tls", true)?;
//!
//! assert_eq!(parser.write(), "[server]\nport: 8080\ntls: yes");
//! # Ok::<(), ini_config::IniError>(())
//! ```
//!
//! ## Comments
//!
//! ```rust
//! use ini_config::{ConfigParser, ParserOptions};
//!
//! let text = "# database settings\n[db]\nhost = localhost # primary";
//! let options = ParserOptions::new().with_preserve_comments(true);
//! let parser = ConfigParser::from_input(text, options)?;
//!
//! assert_eq!(parser.write(), "# database settings\n\n[db]\nhost = localhost # primary");
//! # Ok::<(), ini_config::IniError>(())
//! ```
//!
//! ## Serde
//!
//! ```rust
//! use serde::Deserialize;
//! use ini_config::from_str;
//!
//! #[derive(Debug, Deserialize)]
//! struct Server {
//!     host: String,
//!     port: u16,
//!     debug: bool,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct AppConfig {
//!     server: Server,
//! }
//!
//! let config: AppConfig = from_str("[server]\nhost = example.org\nport = 8080\ndebug = on")?;
//! assert_eq!(config.server.port, 8080);
//! assert!(config.server.debug);
//! # Ok::<(), ini_config::IniError>(())
//! ```
//!
//! ## Error Handling
//!
//! Tokenizer failures carry the position where they were detected:
//!
//! ```rust
//! use ini_config::{ConfigParser, IniError, TokenizeError};
//!
//! match "[unclosed section\nkey = value".parse::<ConfigParser>() {
//!     Err(IniError::Tokenize(TokenizeError::UnterminatedSection { position })) => {
//!         assert_eq!(position.line, 1);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

pub mod comments;
pub mod config;
pub mod config_parser;
pub mod deserializer;
pub mod error;
pub mod fs;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod section;
pub mod value;
pub mod writer;

// Re-export main types for convenience
pub use comments::CommentStore;
pub use config::{Config, Section};
pub use config_parser::ConfigParser;
pub use deserializer::{IniDeserializer, from_config, from_str, from_str_with_options};
pub use error::{IniError, Position, Result, TokenizeError};
pub use lexer::{CHARACTER_TABLE, LexerConfig, StringFormat, Token, Tokenizer};
pub use options::{AssignmentCharacter, DuplicateSectionBehavior, ParserOptions};
pub use parser::{IniParser, ParsedDocument};
pub use section::{SectionView, SectionViewMut};
pub use value::{BooleanFormat, FromValue, Value};
pub use writer::Writer;
