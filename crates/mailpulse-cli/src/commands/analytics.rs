use crate::cli::AnalyticsCommand;
use crate::client::{AppContext, CliResult};
use crate::output::{render_problems, render_summary, render_trends};

pub(crate) async fn handle_analytics(ctx: &AppContext, command: AnalyticsCommand) -> CliResult<()> {
    let analytics = ctx.gateway().analytics();
    match command {
        AnalyticsCommand::Summary(args) => {
            let summary = analytics.summary(args.period).await?;
            render_summary(&summary, ctx.output)
        }
        AnalyticsCommand::Trends(args) => {
            let points = analytics.trends(args.period).await?;
            render_trends(&points, ctx.output)
        }
        AnalyticsCommand::Problems(args) => {
            let problems = analytics.problems(args.period).await?;
            render_problems(&problems, ctx.output)
        }
    }
}
