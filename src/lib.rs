//! The library code for the `quire` static site generator. A build walks a
//! source tree of Markdown posts and assets and writes a static site:
//!
//! 1. Rendering: posts become HTML pages ([`crate::post`]), assets are copied
//! 2. Pagination: the index pages listing every post, newest first
//! 3. Tagging: one page per tag and a tag index ([`crate::tag`])
//! 4. Feeds: the site feed, one feed per tag and a feed index
//!    ([`crate::feed`])
//!
//! [`crate::build`] drives the phases. Output goes through
//! [`crate::write::Writer`] so a dry run can stop short of touching the
//! filesystem, and templates are behind [`crate::template::Render`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod cache;
pub mod collection;
pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod layout;
pub mod markdown;
pub mod post;
pub mod source;
pub mod tag;
pub mod template;
pub mod value;
pub mod write;

/// Installs the global `tracing` subscriber. `verbose` picks the level:
/// 0 shows errors only, 1 info, 2 debug and 3 or more trace. At trace level
/// log lines also carry their target, file and line. `RUST_LOG` directives
/// are honored on top.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let located = level == tracing::Level::TRACE;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(located)
                .with_file(located)
                .with_line_number(located),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
