use super::Shell;
use betsplit_core::types::format_percentage;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;

#[derive(Args)]
pub struct ResultsArgs {
    /// Session file, file name or stem
    session: String,
    /// Calculate even if some bets are still pending
    #[arg(short, long)]
    yes: bool,
    /// Print the settlement as JSON
    #[arg(long)]
    json: bool,
}

pub async fn handle_results_command(args: ResultsArgs, shell: &Shell) -> anyhow::Result<()> {
    let (_, session) = shell.open(&args.session).await?;

    let pending = session.wagers().pending_count();
    if pending > 0 && !args.yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "{} bet(s) are still pending and will count as paying nothing. Calculate anyway?",
                pending
            ))
            .default(false)
            .interact()?;

        if !proceed {
            println!("Mark pending bets with 'betsplit bet won|lost' first.");
            return Ok(());
        }
    }

    let report = session.calculate(shell.calculator())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Results for '{}' ({})", session.meta().event, session.meta().date);
    println!();
    println!("Session Summary:");
    println!("  Total Pool: {}", shell.money(report.total_pool));
    println!("  Total Stakes: {}", shell.money(report.total_stake));
    println!("  Total Winnings: {}", shell.money(report.total_won));
    println!("  Total Losses: {}", shell.money(report.total_lost));
    println!("  Unused Pool: {}", shell.money(report.leftover));
    println!("  Net Profit/Loss: {}", shell.money(report.total_profit));
    println!("  Final Amount: {}", shell.money(report.settled_amount));
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Bettor",
        "Initial Stake",
        "Percentage",
        "Share of Winnings",
        "Share of Leftover",
        "Final Payout",
        "Profit/Loss",
    ]);

    for payout in &report.payouts {
        table.add_row(vec![
            payout.name.clone(),
            shell.money(payout.stake),
            format_percentage(payout.percentage),
            shell.money(payout.share_of_winnings),
            shell.money(payout.share_of_leftover),
            shell.money(payout.final_payout),
            shell.money(payout.net_profit_loss),
        ]);
    }

    println!("Payout Distribution:");
    println!("{}", table);

    if !report.is_final() {
        println!("Note: {} bet(s) were still pending.", report.pending_wagers);
    }

    Ok(())
}
