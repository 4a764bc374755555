use clap::Args;
use jiff::Timestamp;
use patisserie::discounts::Discount;
use patisserie_app::{
    database::{self, Db},
    domain::promotions::{PgPromotionsService, PromotionsService, models::PromoCode},
};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct CreatePromoArgs {
    /// Code customers enter; matched case-insensitively
    #[arg(long)]
    code: String,

    /// Percentage off, 0-100
    #[arg(long)]
    percent: Option<Decimal>,

    /// Flat amount off, in whole currency units
    #[arg(long)]
    amount: Option<i64>,

    /// Expiry as an RFC 3339 timestamp
    #[arg(long)]
    expires_at: Option<Timestamp>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreatePromoArgs) -> Result<(), String> {
    if args.percent.is_none() && args.amount.is_none() {
        return Err("one of --percent or --amount is required".to_string());
    }

    if args.code.trim().is_empty() {
        return Err("code cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgPromotionsService::new(Db::new(pool));

    let promo = service
        .create_code(PromoCode {
            expires_at: args.expires_at,
            ..PromoCode::new(
                args.code.trim(),
                Discount {
                    percent: args.percent,
                    amount: args.amount,
                },
            )
        })
        .await
        .map_err(|error| format!("failed to create promo code: {error}"))?;

    println!("promo_uuid: {}", promo.uuid);
    println!("promo_code: {}", promo.code);

    Ok(())
}
