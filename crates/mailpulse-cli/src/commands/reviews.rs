use mailpulse_api_models::{ReviewFilters, ReviewUpdate};

use crate::cli::{RegenerateArgs, ReviewIdArgs, ReviewListArgs, ReviewUpdateArgs, SelectDraftArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_draft, render_drafts, render_review, render_review_page};

pub(crate) async fn handle_review_list(ctx: &AppContext, args: ReviewListArgs) -> CliResult<()> {
    if let (Some(from), Some(to)) = (args.from, args.to)
        && from > to
    {
        return Err(CliError::validation("--from must not be after --to"));
    }
    let filters = filters_from(args);
    let page = ctx.gateway().reviews().list(&filters).await?;
    render_review_page(&page, ctx.output)
}

pub(crate) async fn handle_review_show(ctx: &AppContext, args: ReviewIdArgs) -> CliResult<()> {
    let review = ctx.gateway().reviews().get(args.id).await?;
    render_review(&review, ctx.output)
}

pub(crate) async fn handle_review_update(
    ctx: &AppContext,
    args: ReviewUpdateArgs,
) -> CliResult<()> {
    let update = ReviewUpdate {
        is_processed: args.processed,
        notes: args.notes,
    };
    if update.is_empty() {
        return Err(CliError::validation(
            "nothing to update; pass --processed or --notes",
        ));
    }
    let review = ctx.gateway().reviews().update(args.id, &update).await?;
    render_review(&review, ctx.output)
}

pub(crate) async fn handle_review_drafts(ctx: &AppContext, args: ReviewIdArgs) -> CliResult<()> {
    let drafts = ctx.gateway().reviews().drafts(args.id).await?;
    render_drafts(&drafts, ctx.output)
}

pub(crate) async fn handle_review_regenerate(
    ctx: &AppContext,
    args: RegenerateArgs,
) -> CliResult<()> {
    let drafts = ctx
        .gateway()
        .reviews()
        .regenerate_drafts(args.id, args.tone)
        .await?;
    render_drafts(&drafts, ctx.output)
}

pub(crate) async fn handle_review_select_draft(
    ctx: &AppContext,
    args: SelectDraftArgs,
) -> CliResult<()> {
    let draft = ctx
        .gateway()
        .reviews()
        .select_draft(args.id, args.draft)
        .await?;
    render_draft(&draft, ctx.output)
}

fn filters_from(args: ReviewListArgs) -> ReviewFilters {
    ReviewFilters {
        sentiment: args.sentiment,
        priority: args.priority,
        is_processed: args.processed,
        email_account_id: args.account,
        date_from: args.from,
        date_to: args.to,
        search: args.search.filter(|term| !term.trim().is_empty()),
        page: args.page,
        page_size: args.page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mailpulse_api_models::Sentiment;

    #[test]
    fn filters_drop_blank_search() {
        let filters = filters_from(ReviewListArgs {
            sentiment: Some(Sentiment::Negative),
            search: Some("   ".to_string()),
            page: Some(2),
            ..ReviewListArgs::default()
        });
        assert_eq!(filters.sentiment, Some(Sentiment::Negative));
        assert_eq!(filters.search, None);
        assert_eq!(filters.page, Some(2));
    }

    #[test]
    fn filters_carry_date_range() {
        let from = NaiveDate::from_ymd_opt(2024, 3, 1);
        let to = NaiveDate::from_ymd_opt(2024, 3, 31);
        let filters = filters_from(ReviewListArgs {
            from,
            to,
            ..ReviewListArgs::default()
        });
        assert_eq!(filters.date_from, from);
        assert_eq!(filters.date_to, to);
    }
}
