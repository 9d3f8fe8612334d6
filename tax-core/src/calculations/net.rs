//! Withholding offset.

use rust_decimal::Decimal;

use crate::models::NetTax;

/// Offsets bracket tax by the tax already withheld.
///
/// A positive remainder is tax still owed. A negative one becomes a refund of
/// its absolute value. Equal amounts yield zero tax and no refund.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::derive_net;
///
/// let owed = derive_net(dec!(29000), dec!(0));
/// assert_eq!(owed.tax, dec!(29000));
///
/// let refund = derive_net(dec!(0), dec!(2000));
/// assert_eq!(refund.refund, dec!(2000));
/// ```
pub fn derive_net(
    total_tax: Decimal,
    wht: Decimal,
) -> NetTax {
    let net = total_tax - wht;
    if net < Decimal::ZERO {
        NetTax {
            tax: Decimal::ZERO,
            refund: -net,
        }
    } else {
        NetTax {
            tax: net,
            refund: Decimal::ZERO,
        }
    }
}
