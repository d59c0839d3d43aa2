//! End-to-end ladder runs against the in-memory exchange.

use ataix_ladder::config::Config;
use ataix_ladder::error::{BotError, ExchangeError, PlanError, SelectionError};
use ataix_ladder::exchange::{MockExchange, TradingPair};
use ataix_ladder::trading::{AcceptedOrder, OrderBatch};
use ataix_ladder::{LadderRunner, RunStage};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config {
        ataix_api_key: "test-key".to_string(),
        settle_pause_ms: 0,
        orders_file: dir.path().join("orders.json"),
        ..Config::default()
    }
}

fn sample_listing() -> Vec<TradingPair> {
    vec![TradingPair::new("AAUSDT", "USDT", dec!(0.5))]
}

#[tokio::test]
async fn hundred_usdt_on_half_dollar_pair() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let exchange = MockExchange::builder()
        .balance(dec!(100))
        .listing(sample_listing())
        .build();

    let runner = LadderRunner::new(exchange, &config);
    let report = runner.run().await.unwrap();

    assert_eq!(report.balance, dec!(100));
    assert_eq!(report.plan.symbol, "AAUSDT");
    assert_eq!(report.plan.bid, dec!(0.5));
    assert_eq!(report.plan.levels, vec![dec!(0.49), dec!(0.475), dec!(0.46)]);
    assert_eq!(report.plan.quantity, dec!(100) / (dec!(3) * dec!(0.5)));

    let placed = runner.exchange().placed_orders();
    let prices: Vec<Decimal> = placed.iter().map(|o| o.price).collect();
    assert_eq!(prices, vec![dec!(0.49), dec!(0.48), dec!(0.46)]);
    assert!(placed.iter().all(|o| o.symbol == "AAUSDT"));
    assert!(placed.iter().all(|o| o.quantity == report.plan.quantity));

    // Selection and bid lookup each fetch the listing.
    assert_eq!(runner.exchange().listing_calls(), 2);
    assert_eq!(report.saved_to.as_deref(), Some(config.orders_file.as_path()));
}

#[tokio::test]
async fn no_usdt_pair_halts_before_any_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let exchange = MockExchange::builder()
        .balance(dec!(100))
        .listing(vec![
            TradingPair::new("AAKZT", "KZT", dec!(0.1)),
            TradingPair::new("BBBTC", "BTC", dec!(0.00001)),
        ])
        .build();

    let runner = LadderRunner::new(exchange, &config);
    let abort = runner.run().await.unwrap_err();

    assert_eq!(abort.stage, RunStage::BalanceOk);
    assert!(matches!(
        abort.source,
        BotError::Selection(SelectionError::NoEligiblePair { .. })
    ));
    assert!(runner.exchange().placed_orders().is_empty());
    assert!(!config.orders_file.exists());
}

#[tokio::test]
async fn one_transport_failure_leaves_two_orders_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let exchange = MockExchange::builder()
        .balance(dec!(100))
        .listing(sample_listing())
        .accept("ord-1")
        .reject(ExchangeError::Transport {
            endpoint: "/api/orders".to_string(),
            reason: "connection reset".to_string(),
        })
        .accept("ord-3")
        .build();

    let report = LadderRunner::new(exchange, &config).run().await.unwrap();

    assert_eq!(report.rejected.len(), 1);
    let saved = OrderBatch::load(&config.orders_file).unwrap();
    assert_eq!(
        saved,
        OrderBatch::from(vec![AcceptedOrder::new("ord-1"), AcceptedOrder::new("ord-3")])
    );
    assert_eq!(saved, report.accepted);
}

#[tokio::test]
async fn all_orders_rejected_still_writes_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let rejected = || ExchangeError::Status {
        endpoint: "/api/orders".to_string(),
        status: 400,
        body: "insufficient balance".to_string(),
    };
    let exchange = MockExchange::builder()
        .balance(dec!(100))
        .listing(sample_listing())
        .reject(rejected())
        .reject(rejected())
        .reject(rejected())
        .build();

    let report = LadderRunner::new(exchange, &config).run().await.unwrap();

    assert!(report.accepted.is_empty());
    assert_eq!(report.rejected.len(), 3);
    assert!(OrderBatch::load(&config.orders_file).unwrap().is_empty());
}

#[tokio::test]
async fn listing_failure_during_bid_lookup_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let exchange = MockExchange::builder()
        .balance(dec!(100))
        .listing(sample_listing())
        .listing_error(ExchangeError::Transport {
            endpoint: "/api/symbols".to_string(),
            reason: "timed out".to_string(),
        })
        .build();

    let runner = LadderRunner::new(exchange, &config);
    let abort = runner.run().await.unwrap_err();

    assert_eq!(abort.stage, RunStage::PairSelected);
    assert!(matches!(abort.source, BotError::Exchange(_)));
    assert!(runner.exchange().placed_orders().is_empty());
}

#[tokio::test]
async fn dust_bid_aborts_instead_of_overflowing() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let exchange = MockExchange::builder()
        .balance(dec!(10000000000))
        .listing(vec![TradingPair::new("TINYUSDT", "USDT", Decimal::new(1, 20))])
        .build();

    let runner = LadderRunner::new(exchange, &config);
    let abort = runner.run().await.unwrap_err();

    assert_eq!(abort.stage, RunStage::PairSelected);
    assert!(matches!(
        abort.source,
        BotError::Plan(PlanError::QuantityOverflow { .. })
    ));
    assert!(runner.exchange().placed_orders().is_empty());
    assert!(!config.orders_file.exists());
}

#[tokio::test]
async fn bid_lookup_uses_fresh_listing() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let exchange = MockExchange::builder()
        .balance(dec!(120))
        .listing(sample_listing())
        .listing(vec![TradingPair::new("AAUSDT", "USDT", dec!(0.8))])
        .build();

    let report = LadderRunner::new(exchange, &config).run().await.unwrap();

    // Bid moved above the threshold between calls; the ladder follows it.
    assert_eq!(report.plan.bid, dec!(0.8));
    assert_eq!(report.plan.quantity, dec!(50));
}

#[tokio::test]
async fn custom_ladder_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        quote_asset: "KZT".to_string(),
        max_bid_price: dec!(500),
        ladder_discounts: vec![dec!(0.01), dec!(0.1)],
        ..test_config(&dir)
    };
    let exchange = MockExchange::builder()
        .balance(dec!(1000))
        .listing(vec![
            TradingPair::new("AAUSDT", "USDT", dec!(0.5)),
            TradingPair::new("USDTKZT", "KZT", dec!(480)),
        ])
        .build();

    let runner = LadderRunner::new(exchange, &config);
    let report = runner.run().await.unwrap();

    assert_eq!(report.plan.symbol, "USDTKZT");
    assert_eq!(report.plan.levels, vec![dec!(475.2), dec!(432)]);
    assert_eq!(runner.exchange().placed_orders().len(), 2);
}
