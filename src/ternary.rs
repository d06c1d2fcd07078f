// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// A one-line `if`/`else` expression.  The seam code is full of
/// two-way choices on coordinates: whether a neighbour falls off the
/// edge of the image, and whether an index sits before or after the
/// seam and has to shift.  Written as `cq!(cond, a, b)` each of those
/// stays on the line it belongs to instead of being spread over five.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}
