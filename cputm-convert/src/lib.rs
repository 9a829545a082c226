//! Check Point SmartConsole export conversion for UTM appliances.
//!
//! This library converts a SmartConsole JSON export (a flat array of
//! uid-keyed objects and policy rules) into the named-entity schema a UTM
//! appliance imports: service definitions, IP and URL lists, application
//! groups, and the firewall, content and flood rules that reference them by
//! name. The two models disagree about identity itself: the source resolves
//! references through opaque uids, the target through unique names per
//! collection. Everything in this crate exists to cross that gap without
//! silently losing policy.
//!
//! # Architecture
//!
//! The library is organized into several functional areas:
//!
//! ## Extraction
//!
//! - [`source`]: load the export into a uid-keyed object map plus the
//!   ordered rule list
//! - [`tables`]: port catalog and name dictionaries, embedded with file
//!   override
//!
//! ## Translation
//!
//! - [`sanitize`]: entity name cleanup for the target's charset
//! - [`resolve`]: the write-once uid resolution map
//! - [`translate`]: objects to entities (services, lists, groups,
//!   identities, sentinels)
//! - [`relink`]: rules from uid references to name references
//!
//! ## Import
//!
//! - [`import`]: idempotent create-or-update push into an object store
//!
//! ## Reporting
//!
//! - [`check`]: dry-run readiness assessment with recommendations
//! - [`inspect`]: export contents grouped by type
//! - [`summary`]: post-conversion summary statistics
//! - [`report`]: terminal-friendly colored output
//!
//! # Workflow
//!
//! The typical migration workflow:
//!
//! 1. **Inspect** the export to see what it contains
//! 2. **Check** readiness: unknown types, catalog misses, unlinkable rules
//! 3. **Convert** to an import tree of per-kind JSON files
//! 4. **Import** the tree into a target store, idempotently
//!
//! # Examples
//!
//! ```ignore
//! use cputm_convert::source::load_export;
//! use cputm_convert::tables::default_tables;
//! use cputm_convert::translate::translate;
//! use cputm_convert::relink::relink;
//!
//! let export = load_export("smartconsole-export.json".as_ref())?;
//! let translation = translate(&export, &default_tables());
//! let rules = relink(&export.rules, &translation.resolved);
//! println!("entities: {}, rules: {}", translation.entities.len(), rules.firewall.len());
//! ```
//!
//! # Built on utm-store-core
//!
//! This library uses `utm-store-core` for the target schema, store trait and
//! snapshot handling. All source-format logic is contained in this crate.

pub mod check;
pub mod import;
pub mod inspect;
pub mod relink;
pub mod report;
pub mod resolve;
pub mod sanitize;
pub mod source;
pub mod summary;
pub mod tables;
pub mod translate;
