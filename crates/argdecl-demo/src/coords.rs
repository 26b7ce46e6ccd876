//! Cartesian coordinates and the two textual forms the demo accepts.
//!
//! - spread over three tokens: `x=1 y=2 z=3`, axes in any order;
//! - one labeled token: `(x;y;z)=(.1;.01;.5)`, labels in any order.

use std::fmt;

use argdecl::ValueCodec;
use argdecl::codec::single_token;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// Every accepted labelling of the three values.
const ORDERS: [[Axis; 3]; 6] = [
    [Axis::X, Axis::Y, Axis::Z],
    [Axis::X, Axis::Z, Axis::Y],
    [Axis::Y, Axis::X, Axis::Z],
    [Axis::Y, Axis::Z, Axis::X],
    [Axis::Z, Axis::X, Axis::Y],
    [Axis::Z, Axis::Y, Axis::X],
];

impl Axis {
    fn parse(label: &str) -> Result<Self, String> {
        match label.trim() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            other => Err(format!("unknown axis '{other}'")),
        }
    }
}

impl Coords {
    fn axis_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    fn assemble(axes: [Axis; 3], values: [f64; 3]) -> Result<Self, String> {
        if !ORDERS.contains(&axes) {
            return Err("axes must name x, y and z once each".to_string());
        }
        let mut coords = Self::default();
        for (axis, value) in axes.into_iter().zip(values) {
            *coords.axis_mut(axis) = value;
        }
        Ok(coords)
    }
}

fn parse_number(text: &str) -> Result<f64, String> {
    let text = text.trim();
    text.parse()
        .map_err(|e| format!("'{text}' is not a number: {e}"))
}

fn three<T>(items: Vec<T>, what: &str) -> Result<[T; 3], String> {
    items
        .try_into()
        .map_err(|items: Vec<T>| format!("expected 3 {what}, got {}", items.len()))
}

/// `x=1 y=2 z=3` over three tokens.
pub struct CartesianCodec;

impl ValueCodec<Coords> for CartesianCodec {
    fn token_width(&self) -> usize {
        3
    }

    fn decode(&self, tokens: &[String]) -> Result<Coords, String> {
        let pairs = tokens
            .iter()
            .map(|token| -> Result<(Axis, f64), String> {
                let (label, value) = token
                    .split_once('=')
                    .ok_or_else(|| format!("expected axis=value, got '{token}'"))?;
                Ok((Axis::parse(label)?, parse_number(value)?))
            })
            .collect::<Result<Vec<_>, String>>()?;
        let [a, b, c] = three(pairs, "coordinates")?;
        Coords::assemble([a.0, b.0, c.0], [a.1, b.1, c.1])
    }

    fn encode(&self, value: &Coords, out: &mut String) -> Result<(), String> {
        out.push_str(&format!("x={} y={} z={}", value.x, value.y, value.z));
        Ok(())
    }
}

/// Decode `(x;y;z)=(.1;.01;.5)` from a single token.
pub fn decode_labeled(tokens: &[String]) -> Result<Coords, String> {
    let token = single_token(tokens)?;
    let inner = token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| format!("expected (labels)=(values), got '{token}'"))?;
    let (labels, values) = inner
        .split_once(")=(")
        .ok_or_else(|| format!("expected (labels)=(values), got '{token}'"))?;

    let axes = labels
        .split(';')
        .map(Axis::parse)
        .collect::<Result<Vec<_>, String>>()?;
    let values = values
        .split(';')
        .map(parse_number)
        .collect::<Result<Vec<_>, String>>()?;
    Coords::assemble(three(axes, "labels")?, three(values, "values")?)
}

pub fn encode_labeled(value: &Coords, out: &mut String) -> Result<(), String> {
    out.push_str(&format!("(x;y;z)=({};{};{})", value.x, value.y, value.z));
    Ok(())
}
