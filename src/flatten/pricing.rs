//! Close-order price policy

use crate::exchange::{OrderSide, PositionSide};
use rust_decimal::{Decimal, RoundingStrategy};

/// Order side that reduces a position
pub fn closing_side(side: PositionSide) -> OrderSide {
    match side {
        PositionSide::Long => OrderSide::Sell,
        PositionSide::Short => OrderSide::Buy,
    }
}

/// Marketable limit price far through the book on the closing side
pub fn aggressive_price(
    entry_price: Decimal,
    side: OrderSide,
    buy_multiplier: Decimal,
    sell_multiplier: Decimal,
) -> Decimal {
    match side {
        OrderSide::Buy => entry_price * buy_multiplier,
        OrderSide::Sell => entry_price * sell_multiplier,
    }
}

/// Round `price` to the nearest multiple of `tick_size`
///
/// Midpoints round away from zero. The result carries the tick's decimal
/// scale. A non-positive tick leaves the price unchanged.
pub fn round_to_tick(price: Decimal, tick_size: Decimal) -> Decimal {
    if tick_size <= Decimal::ZERO {
        return price;
    }
    let Some(ticks) = price.checked_div(tick_size) else {
        return price;
    };
    let mut rounded = ticks.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * tick_size;
    rounded.rescale(tick_size.scale());
    rounded
}

/// Close-order price on the tick grid, never below one tick
///
/// A sell far through the book on a coarse tick would otherwise round to zero.
pub fn close_price(
    entry_price: Decimal,
    side: OrderSide,
    buy_multiplier: Decimal,
    sell_multiplier: Decimal,
    tick_size: Decimal,
) -> Decimal {
    let raw = aggressive_price(entry_price, side, buy_multiplier, sell_multiplier);
    round_to_tick(raw, tick_size).max(tick_size)
}
