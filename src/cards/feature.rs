//! Card features.
//!
//! Every card carries one value on each of four independent axes. Each
//! axis is a closed enum with exactly three members, which is what makes
//! the "third value" of any pair unique.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// Behaviour shared by the four feature axes.
pub trait Feature: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
    /// Every value of the axis, in display order.
    const ALL: &'static [Self];

    /// Short human-readable label.
    fn label(self) -> &'static str;

    /// The value that completes `a` and `b` into a valid triple.
    ///
    /// Equal inputs need a third equal value; distinct inputs need the
    /// remaining one.
    ///
    /// # Panics
    ///
    /// Panics if the axis does not have exactly three members.
    #[must_use]
    fn third(a: Self, b: Self) -> Self {
        assert_eq!(
            Self::ALL.len(),
            3,
            "feature axis {:?} must have exactly 3 values",
            a
        );
        if a == b {
            return a;
        }
        match Self::ALL.iter().find(|&&v| v != a && v != b) {
            Some(&v) => v,
            None => panic!("feature axis values {:?} and {:?} are not members of ALL", a, b),
        }
    }

    /// Pick a value uniformly at random.
    fn random(rng: &mut GameRng) -> Self {
        match rng.choose(Self::ALL) {
            Some(&v) => v,
            None => panic!("feature axis has no values"),
        }
    }
}

/// How many symbols are printed on the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Number {
    One,
    Two,
    Three,
}

impl Number {
    /// Symbol count as an integer.
    #[must_use]
    pub const fn count(self) -> u8 {
        match self {
            Number::One => 1,
            Number::Two => 2,
            Number::Three => 3,
        }
    }
}

impl Feature for Number {
    const ALL: &'static [Self] = &[Number::One, Number::Two, Number::Three];

    fn label(self) -> &'static str {
        match self {
            Number::One => "1",
            Number::Two => "2",
            Number::Three => "3",
        }
    }
}

/// Which symbol is printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Skull,
    Swirl,
    Alien,
}

impl Feature for Symbol {
    const ALL: &'static [Self] = &[Symbol::Skull, Symbol::Swirl, Symbol::Alien];

    fn label(self) -> &'static str {
        match self {
            Symbol::Skull => "skull",
            Symbol::Swirl => "swirl",
            Symbol::Alien => "alien",
        }
    }
}

/// Border shading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shading {
    White,
    Gray,
    Black,
}

impl Feature for Shading {
    const ALL: &'static [Self] = &[Shading::White, Shading::Gray, Shading::Black];

    fn label(self) -> &'static str {
        match self {
            Shading::White => "white",
            Shading::Gray => "gray",
            Shading::Black => "black",
        }
    }
}

/// Card face color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Blue,
}

impl Feature for Color {
    const ALL: &'static [Self] = &[Color::Red, Color::Yellow, Color::Blue];

    fn label(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(Number, Symbol, Shading, Color);

#[cfg(test)]
mod tests {
    use super::*;

    fn check_axis<F: Feature>() {
        for &a in F::ALL {
            assert_eq!(F::third(a, a), a);
            for &b in F::ALL {
                let c = F::third(a, b);
                assert_eq!(c, F::third(b, a));
                if a != b {
                    assert_ne!(c, a);
                    assert_ne!(c, b);
                }
            }
        }
    }

    #[test]
    fn test_third_value_all_axes() {
        check_axis::<Number>();
        check_axis::<Symbol>();
        check_axis::<Shading>();
        check_axis::<Color>();
    }

    #[test]
    fn test_third_value_examples() {
        assert_eq!(Color::third(Color::Red, Color::Blue), Color::Yellow);
        assert_eq!(Number::third(Number::Two, Number::Two), Number::Two);
        assert_eq!(Shading::third(Shading::Gray, Shading::White), Shading::Black);
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Broken {
        A,
        B,
    }

    impl Feature for Broken {
        const ALL: &'static [Self] = &[Broken::A, Broken::B];

        fn label(self) -> &'static str {
            "broken"
        }
    }

    #[test]
    #[should_panic(expected = "must have exactly 3 values")]
    fn test_two_valued_axis_panics() {
        let _ = Broken::third(Broken::A, Broken::B);
    }

    #[test]
    fn test_random_is_member() {
        let mut rng = GameRng::new(3);
        for _ in 0..20 {
            assert!(Symbol::ALL.contains(&Symbol::random(&mut rng)));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::Three.to_string(), "3");
        assert_eq!(Number::Three.count(), 3);
        assert_eq!(Color::Yellow.to_string(), "yellow");
    }
}
