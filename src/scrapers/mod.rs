//! Heuristic scraping stages for the target blog.
//!
//! The target site's markup is not under our control, so every stage that
//! reads HTML works from an ordered list of selector strategies and treats a
//! miss as "try the next one" rather than as an error.
//!
//! # Stages
//!
//! | Stage | Module | Input | Output |
//! |-------|--------|-------|--------|
//! | Pagination discovery | [`pagination`] | Listing root | Highest page number |
//! | Link collection | [`links`] | One listing page | Unique candidate URLs |
//! | Crawl planning | [`planner`] | Last page + page callback | Extraction window |
//! | Article extraction | [`article`] | Article page | Title + body |
//!
//! Selector strategies are shared through [`strategy`].

pub mod article;
pub mod links;
pub mod pagination;
pub mod planner;
pub mod strategy;
