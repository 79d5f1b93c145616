//! Per-asset step function storage and the legacy command table

use rate_model::{LegacyCurve, ModelError, PackedCurve, StepMode};

use crate::error::{RateError, Result};
use crate::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Qty,
    Imbalance,
}

/// One stored curve in the deployment's step mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Curve {
    Legacy(LegacyCurve),
    Packed(PackedCurve),
}

impl Curve {
    pub fn empty(mode: StepMode) -> Self {
        match mode {
            StepMode::Legacy => Curve::Legacy(LegacyCurve::default()),
            StepMode::Enhanced => Curve::Packed(PackedCurve::default()),
        }
    }

    pub fn x_len(&self) -> usize {
        match self {
            Curve::Legacy(c) => c.xs().len(),
            Curve::Packed(c) => c.x_len(),
        }
    }

    pub fn y_len(&self) -> usize {
        match self {
            Curve::Legacy(c) => c.ys().len(),
            Curve::Packed(c) => c.y_len(),
        }
    }

    pub fn x(&self, index: usize) -> Option<i128> {
        match self {
            Curve::Legacy(c) => c.xs().get(index).copied(),
            Curve::Packed(c) => c.x(index),
        }
    }

    pub fn y(&self, index: usize) -> Option<i128> {
        match self {
            Curve::Legacy(c) => c.ys().get(index).copied(),
            Curve::Packed(c) => c.y(index),
        }
    }

    /// Legacy curves are evaluated at `to`; packed curves over `[from, to)`
    pub fn eval(&self, from: i128, to: i128) -> core::result::Result<i128, ModelError> {
        match self {
            Curve::Legacy(c) => c.eval(to),
            Curve::Packed(c) => c.eval(from, to),
        }
    }

    /// bps for moving an imbalance (or quantity) from `current` to `after`
    ///
    /// Legacy curves look at the end point; packed curves average over the
    /// traversed range.
    pub fn eval_move(&self, current: i128, after: i128) -> core::result::Result<i128, ModelError> {
        match self {
            Curve::Legacy(c) => c.eval(after),
            Curve::Packed(c) => c.eval(current.min(after), current.max(after)),
        }
    }

    pub fn xs(&self) -> Vec<i128> {
        (0..self.x_len()).filter_map(|i| self.x(i)).collect()
    }

    pub fn ys(&self) -> Vec<i128> {
        (0..self.y_len()).filter_map(|i| self.y(i)).collect()
    }
}

/// The four curves of one asset
///
/// Enhanced deployments have no quantity curves; `qty` returns `None` there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCurves {
    qty_buy: Option<Curve>,
    qty_sell: Option<Curve>,
    imbalance_buy: Curve,
    imbalance_sell: Curve,
}

impl AssetCurves {
    pub fn new(mode: StepMode) -> Self {
        let qty = match mode {
            StepMode::Legacy => Some(Curve::empty(mode)),
            StepMode::Enhanced => None,
        };
        Self {
            qty_buy: qty.clone(),
            qty_sell: qty,
            imbalance_buy: Curve::empty(mode),
            imbalance_sell: Curve::empty(mode),
        }
    }

    pub fn qty(&self, side: Side) -> Option<&Curve> {
        match side {
            Side::Buy => self.qty_buy.as_ref(),
            Side::Sell => self.qty_sell.as_ref(),
        }
    }

    pub fn imbalance(&self, side: Side) -> &Curve {
        match side {
            Side::Buy => &self.imbalance_buy,
            Side::Sell => &self.imbalance_sell,
        }
    }

    pub fn curve(&self, kind: CurveKind, side: Side) -> Option<&Curve> {
        match kind {
            CurveKind::Qty => self.qty(side),
            CurveKind::Imbalance => Some(self.imbalance(side)),
        }
    }

    pub fn set_qty(&mut self, buy: Curve, sell: Curve) {
        self.qty_buy = Some(buy);
        self.qty_sell = Some(sell);
    }

    pub fn set_imbalance(&mut self, buy: Curve, sell: Curve) {
        self.imbalance_buy = buy;
        self.imbalance_sell = sell;
    }

    /// Read one value through the command table
    pub fn command_value(&self, command: StepCommand, param: usize) -> Result<i128> {
        let curve = self
            .curve(command.kind, command.side)
            .ok_or(RateError::UnknownCommand(command.code()))?;
        let indexed = |value: Option<i128>, len: usize| {
            value.ok_or(RateError::StepIndexOutOfRange { index: param, len })
        };
        match command.field {
            StepField::XLength => Ok(curve.x_len() as i128),
            StepField::X => indexed(curve.x(param), curve.x_len()),
            StepField::YLength => Ok(curve.y_len() as i128),
            StepField::Y => indexed(curve.y(param), curve.y_len()),
        }
    }
}

// ============================================================================
// Command table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    XLength,
    X,
    YLength,
    Y,
}

/// Decoded introspection command
///
/// | code   | curve          |
/// |--------|----------------|
/// | 0..=3  | quantity buy   |
/// | 4..=7  | quantity sell  |
/// | 8..=11 | imbalance buy  |
/// | 12..=15| imbalance sell |
///
/// Within a group: X length, X[param], Y length, Y[param].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCommand {
    pub kind: CurveKind,
    pub side: Side,
    pub field: StepField,
}

impl StepCommand {
    pub fn code(&self) -> u8 {
        let group = match (self.kind, self.side) {
            (CurveKind::Qty, Side::Buy) => 0,
            (CurveKind::Qty, Side::Sell) => 1,
            (CurveKind::Imbalance, Side::Buy) => 2,
            (CurveKind::Imbalance, Side::Sell) => 3,
        };
        let field = match self.field {
            StepField::XLength => 0,
            StepField::X => 1,
            StepField::YLength => 2,
            StepField::Y => 3,
        };
        group * 4 + field
    }
}

impl TryFrom<u8> for StepCommand {
    type Error = RateError;

    fn try_from(code: u8) -> Result<Self> {
        let (kind, side) = match code / 4 {
            0 => (CurveKind::Qty, Side::Buy),
            1 => (CurveKind::Qty, Side::Sell),
            2 => (CurveKind::Imbalance, Side::Buy),
            3 => (CurveKind::Imbalance, Side::Sell),
            _ => return Err(RateError::UnknownCommand(code)),
        };
        let field = match code % 4 {
            0 => StepField::XLength,
            1 => StepField::X,
            2 => StepField::YLength,
            _ => StepField::Y,
        };
        Ok(Self { kind, side, field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes_round_trip() {
        for code in 0..16u8 {
            let command = StepCommand::try_from(code).unwrap();
            assert_eq!(command.code(), code);
        }
        assert_eq!(StepCommand::try_from(16u8), Err(RateError::UnknownCommand(16)));
        assert_eq!(
            StepCommand::try_from(9u8).unwrap(),
            StepCommand {
                kind: CurveKind::Imbalance,
                side: Side::Buy,
                field: StepField::X,
            }
        );
    }

    #[test]
    fn test_legacy_command_values() {
        let mut curves = AssetCurves::new(StepMode::Legacy);
        let buy = LegacyCurve::new(&[15, 30, 70], &[8, 30, 70], 10_000, true).unwrap();
        let sell = LegacyCurve::new(&[155, 305, 705], &[10, 32, 78], 10_000, true).unwrap();
        curves.set_qty(Curve::Legacy(buy), Curve::Legacy(sell));

        let read = |code: u8, param: usize| {
            curves.command_value(StepCommand::try_from(code).unwrap(), param)
        };
        assert_eq!(read(0, 0), Ok(3));
        assert_eq!(read(1, 2), Ok(70));
        assert_eq!(read(3, 0), Ok(8));
        assert_eq!(read(5, 1), Ok(305));
        assert_eq!(read(7, 2), Ok(78));
        assert_eq!(read(8, 0), Ok(0));
        assert_eq!(
            read(1, 3),
            Err(RateError::StepIndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_enhanced_command_values() {
        let mut curves = AssetCurves::new(StepMode::Enhanced);
        let buy = PackedCurve::new(&[-100, 100], &[5, 0, -10_000], 10_000).unwrap();
        curves.set_imbalance(Curve::Packed(buy), Curve::empty(StepMode::Enhanced));

        let read = |code: u8, param: usize| {
            curves.command_value(StepCommand::try_from(code).unwrap(), param)
        };
        assert_eq!(read(8, 0), Ok(2));
        assert_eq!(read(9, 1), Ok(100));
        assert_eq!(read(10, 0), Ok(3));
        assert_eq!(read(11, 2), Ok(-10_000));
        assert_eq!(read(12, 0), Ok(0));
        assert_eq!(read(14, 0), Ok(0));
        assert_eq!(read(0, 0), Err(RateError::UnknownCommand(0)));
        assert_eq!(read(6, 0), Err(RateError::UnknownCommand(6)));
        // The terminator word is not a breakpoint
        assert_eq!(
            read(9, 2),
            Err(RateError::StepIndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_curve_accessors() {
        let curve = Curve::Packed(PackedCurve::new(&[1, 2], &[3, 4, 5], 10_000).unwrap());
        assert_eq!(curve.xs(), vec![1, 2]);
        assert_eq!(curve.ys(), vec![3, 4, 5]);
        assert_eq!(Curve::empty(StepMode::Legacy).y_len(), 0);
    }
}
