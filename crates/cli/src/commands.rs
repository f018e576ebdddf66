//! CLI commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use pledge_client::{
    PledgeClient,
    types::{Campaign, Credentials, NewCampaign, NewDonation, RegisterRequest},
};
use tracing::info;

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new account
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        password: String,
    },

    /// Sign in and store the session
    Login {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Drop the stored session
    Logout,

    /// Campaign operations
    Campaign {
        #[command(subcommand)]
        command: CampaignCommands,
    },

    /// Donate to a campaign
    Donate {
        /// Campaign id
        campaign: i64,

        /// Amount to donate
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum CampaignCommands {
    /// List all campaigns
    List,

    /// Show a single campaign
    Show { id: i64 },

    /// List campaigns you own
    Mine,

    /// Create a campaign
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        target_amount: f64,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end_date: NaiveDate,
    },

    /// Replace a campaign's fields
    Update {
        id: i64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        target_amount: f64,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end_date: NaiveDate,
    },

    /// Delete a campaign
    Delete { id: i64 },
}

impl Commands {
    pub async fn execute(self, client: &PledgeClient) -> Result<()> {
        match self {
            Commands::Register {
                username,
                first_name,
                last_name,
                email,
                phone,
                password,
            } => {
                let response = client
                    .register(RegisterRequest {
                        username,
                        first_name,
                        last_name,
                        email,
                        phone,
                        confirm_password: password.clone(),
                        password,
                    })
                    .await?;
                println!("{}", response.message);
                Ok(())
            }
            Commands::Login { username, password } => {
                client
                    .login(Credentials {
                        username: username.clone(),
                        password,
                    })
                    .await?;
                info!("session stored");
                println!("Logged in as {username}");
                Ok(())
            }
            Commands::Logout => {
                client.logout();
                println!("Logged out");
                Ok(())
            }
            Commands::Campaign { command } => command.execute(client).await,
            Commands::Donate { campaign, amount } => {
                let donation = client.donate(NewDonation { campaign, amount }).await?;
                println!(
                    "Donated {:.2} to campaign {} (donation #{})",
                    donation.amount, donation.campaign, donation.id
                );
                Ok(())
            }
        }
    }
}

impl CampaignCommands {
    pub async fn execute(self, client: &PledgeClient) -> Result<()> {
        match self {
            CampaignCommands::List => {
                let campaigns = client.list_campaigns().await?;
                print_campaigns(&campaigns);
                Ok(())
            }
            CampaignCommands::Show { id } => {
                let campaign = client.get_campaign(id).await?;
                print_campaign(&campaign);
                Ok(())
            }
            CampaignCommands::Mine => {
                let campaigns = client.my_campaigns().await?;
                print_campaigns(&campaigns);
                Ok(())
            }
            CampaignCommands::Create {
                title,
                description,
                target_amount,
                start_date,
                end_date,
            } => {
                let campaign = client
                    .create_campaign(NewCampaign {
                        title,
                        description,
                        target_amount,
                        start_date,
                        end_date,
                    })
                    .await?;
                println!("Created campaign #{}", campaign.id);
                Ok(())
            }
            CampaignCommands::Update {
                id,
                title,
                description,
                target_amount,
                start_date,
                end_date,
            } => {
                let campaign = client
                    .update_campaign(
                        id,
                        NewCampaign {
                            title,
                            description,
                            target_amount,
                            start_date,
                            end_date,
                        },
                    )
                    .await?;
                println!("Updated campaign #{}", campaign.id);
                Ok(())
            }
            CampaignCommands::Delete { id } => {
                client.delete_campaign(id).await?;
                println!("Deleted campaign #{id}");
                Ok(())
            }
        }
    }
}

fn print_campaigns(campaigns: &[Campaign]) {
    if campaigns.is_empty() {
        println!("No campaigns found");
        return;
    }
    for campaign in campaigns {
        println!(
            "#{} {} ({:.2} / {:.2}) {} - {}",
            campaign.id,
            campaign.title,
            campaign.total_donations.unwrap_or(0.0),
            campaign.target_amount,
            campaign.start_date,
            campaign.end_date
        );
    }
}

fn print_campaign(campaign: &Campaign) {
    println!("Campaign #{}", campaign.id);
    println!("  Title: {}", campaign.title);
    println!("  Owner: {}", campaign.owner);
    println!("  Target: {:.2}", campaign.target_amount);
    println!(
        "  Raised: {:.2}",
        campaign.total_donations.unwrap_or(0.0)
    );
    println!("  Runs: {} - {}", campaign.start_date, campaign.end_date);
    println!();
    println!("{}", campaign.description);
}
