use crate::cli::{ConnectArgs, DisconnectArgs};
use crate::client::{AppContext, CliResult};
use crate::output::{render_accounts, render_message, render_url};

pub(crate) async fn handle_accounts_list(ctx: &AppContext) -> CliResult<()> {
    let accounts = ctx.gateway().accounts().list().await?;
    render_accounts(&accounts, ctx.output)
}

pub(crate) async fn handle_accounts_connect(ctx: &AppContext, args: ConnectArgs) -> CliResult<()> {
    let connect = ctx
        .gateway()
        .accounts()
        .connect_url(args.redirect_to.as_deref())
        .await?;
    render_url(&connect.authorization_url, ctx.output)
}

pub(crate) async fn handle_accounts_disconnect(
    ctx: &AppContext,
    args: DisconnectArgs,
) -> CliResult<()> {
    ctx.gateway().accounts().disconnect(args.id).await?;
    render_message(&format!("Disconnected {}.", args.id), ctx.output)
}
