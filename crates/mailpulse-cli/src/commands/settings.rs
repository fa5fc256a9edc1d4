use mailpulse_api_models::{CompanySettingsPatch, NotificationSettingsPatch, ProfileSettingsPatch};

use crate::cli::{CompanyArgs, NotificationArgs, ProfileArgs, SettingsSection, SettingsShowArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_company, render_notifications, render_profile};

const NOTHING_TO_UPDATE: &str = "nothing to update; pass at least one option";

pub(crate) async fn handle_settings_show(ctx: &AppContext, args: SettingsShowArgs) -> CliResult<()> {
    let settings = ctx.gateway().settings();
    match args.section {
        SettingsSection::Notifications => {
            render_notifications(&settings.notifications().await?, ctx.output)
        }
        SettingsSection::Company => render_company(&settings.company().await?, ctx.output),
        SettingsSection::Profile => render_profile(&settings.profile().await?, ctx.output),
    }
}

pub(crate) async fn handle_settings_set_notifications(
    ctx: &AppContext,
    args: NotificationArgs,
) -> CliResult<()> {
    let patch = NotificationSettingsPatch {
        email_enabled: args.email_enabled,
        email_address: args.email_address,
        telegram_enabled: args.telegram_enabled,
        telegram_chat_id: args.telegram_chat_id,
        sms_enabled: args.sms_enabled,
        phone_number: args.phone_number,
        notify_on_negative: args.notify_on_negative,
        notify_on_critical: args.notify_on_critical,
        weekly_report: args.weekly_report,
    };
    if patch == NotificationSettingsPatch::default() {
        return Err(CliError::validation(NOTHING_TO_UPDATE));
    }
    let updated = ctx
        .gateway()
        .settings()
        .update_notifications(&patch)
        .await?;
    render_notifications(&updated, ctx.output)
}

pub(crate) async fn handle_settings_set_company(
    ctx: &AppContext,
    args: CompanyArgs,
) -> CliResult<()> {
    let patch = CompanySettingsPatch {
        company_name: args.company_name,
        industry: args.industry,
        response_tone: args.tone,
        custom_instructions: args.instructions,
    };
    if patch == CompanySettingsPatch::default() {
        return Err(CliError::validation(NOTHING_TO_UPDATE));
    }
    let updated = ctx.gateway().settings().update_company(&patch).await?;
    render_company(&updated, ctx.output)
}

pub(crate) async fn handle_settings_set_profile(
    ctx: &AppContext,
    args: ProfileArgs,
) -> CliResult<()> {
    let patch = ProfileSettingsPatch {
        name: args.name,
        email: args.email,
    };
    if patch == ProfileSettingsPatch::default() {
        return Err(CliError::validation(NOTHING_TO_UPDATE));
    }
    let updated = ctx.gateway().settings().update_profile(&patch).await?;
    render_profile(&updated, ctx.output)
}
