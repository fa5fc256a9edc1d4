use crate::cli::{CancelArgs, CheckoutArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_invoices, render_message, render_subscription, render_url, render_usage};

pub(crate) async fn handle_billing_subscription(ctx: &AppContext) -> CliResult<()> {
    let subscription = ctx.gateway().billing().subscription().await?;
    render_subscription(&subscription, ctx.output)
}

pub(crate) async fn handle_billing_invoices(ctx: &AppContext) -> CliResult<()> {
    let invoices = ctx.gateway().billing().invoices().await?;
    render_invoices(&invoices, ctx.output)
}

pub(crate) async fn handle_billing_usage(ctx: &AppContext) -> CliResult<()> {
    let usage = ctx.gateway().billing().usage().await?;
    render_usage(&usage, ctx.output)
}

pub(crate) async fn handle_billing_checkout(ctx: &AppContext, args: CheckoutArgs) -> CliResult<()> {
    let plan = args.plan.trim();
    if plan.is_empty() {
        return Err(CliError::validation("plan cannot be empty"));
    }
    let redirect = ctx
        .gateway()
        .billing()
        .checkout(plan, args.period.as_deref())
        .await?;
    render_url(&redirect.url, ctx.output)
}

pub(crate) async fn handle_billing_portal(ctx: &AppContext) -> CliResult<()> {
    let redirect = ctx.gateway().billing().portal().await?;
    render_url(&redirect.url, ctx.output)
}

pub(crate) async fn handle_billing_cancel(ctx: &AppContext, args: CancelArgs) -> CliResult<()> {
    if !args.yes {
        return Err(CliError::validation(
            "cancelling stops the subscription at period end; re-run with --yes to confirm",
        ));
    }
    let response = ctx.gateway().billing().cancel().await?;
    render_message(&response.message, ctx.output)
}
