//! Release history.

use anyhow::Result;
use console::style;
use mobi_admin::{Changelog, Release};

use super::ChangelogArgs;
use crate::context::Context;

pub async fn run(args: ChangelogArgs, ctx: &Context) -> Result<()> {
    let changelog = Changelog::bundled()?;
    let releases: &[Release] = if args.all {
        changelog.releases()
    } else {
        &changelog.releases()[..changelog.len().min(1)]
    };

    if ctx.output.is_json() {
        ctx.output.json(&releases);
        return Ok(());
    }

    if releases.is_empty() {
        ctx.output.info("No releases recorded.");
        return Ok(());
    }

    for release in releases {
        ctx.output.header(&format!("{} ({}) {}", release.version, release.date, release.title));
        for change in &release.changes {
            ctx.output.list_item(&format!(
                "{} {}",
                style(format!("[{}]", change.kind.as_str())).dim(),
                change.description
            ));
        }
    }
    Ok(())
}
