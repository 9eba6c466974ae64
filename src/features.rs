//! Feature vectors handed to learned-model predictors
//!
//! Each `FeatureSchema` is a versioned contract: the field order of a schema
//! never changes, new fields go into a new schema.

use serde::{Deserialize, Serialize};

use crate::analysis::safe_set;
use crate::game::{Direction, GameState};

/// How a feature is typed in a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Numeric,
    /// 0/1 in vectors, `True`/`False` in ARFF files
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
}

const fn numeric(name: &'static str) -> Attribute {
    Attribute {
        name,
        kind: AttributeKind::Numeric,
    }
}

const fn boolean(name: &'static str) -> Attribute {
    Attribute {
        name,
        kind: AttributeKind::Boolean,
    }
}

const BASIC: [Attribute; 8] = [
    numeric("snake_pos_x"),
    numeric("snake_pos_y"),
    numeric("snake_body_length"),
    numeric("food_pos_x"),
    numeric("food_pos_y"),
    numeric("horizontal_distance"),
    numeric("vertical_distance"),
    numeric("score"),
];

const SAFE: [Attribute; 4] = [
    boolean("left_safe"),
    boolean("right_safe"),
    boolean("up_safe"),
    boolean("down_safe"),
];

const BODY_DISTANCE: [Attribute; 4] = [
    numeric("body_distance_left"),
    numeric("body_distance_right"),
    numeric("body_distance_up"),
    numeric("body_distance_down"),
];

const FOOD_FLAGS: [Attribute; 6] = [
    boolean("food_in_row"),
    boolean("food_in_col"),
    boolean("food_in_up"),
    boolean("food_in_down"),
    boolean("food_in_left"),
    boolean("food_in_right"),
];

/// Versioned feature layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSchema {
    /// Position, food, distances and score
    Basic,
    /// Basic plus body length and the four safe-move flags
    Safety,
    /// Basic plus safe-move flags, body distances and food direction flags
    Full,
}

impl FeatureSchema {
    pub fn version(&self) -> u32 {
        match self {
            FeatureSchema::Basic => 1,
            FeatureSchema::Safety => 2,
            FeatureSchema::Full => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeatureSchema::Basic => "basic",
            FeatureSchema::Safety => "safety",
            FeatureSchema::Full => "full",
        }
    }

    /// Attributes in vector order
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = BASIC.to_vec();
        match self {
            FeatureSchema::Basic => {}
            FeatureSchema::Safety => {
                attrs.push(numeric("body_parts"));
                attrs.extend(SAFE);
            }
            FeatureSchema::Full => {
                attrs.extend(SAFE);
                attrs.extend(BODY_DISTANCE);
                attrs.extend(FOOD_FLAGS);
            }
        }
        attrs
    }

    pub fn len(&self) -> usize {
        match self {
            FeatureSchema::Basic => 8,
            FeatureSchema::Safety => 13,
            FeatureSchema::Full => 22,
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes().iter().position(|a| a.name == name)
    }
}

/// Fixed-order numeric features of one state
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Build the features of `state` in `schema` order
    pub fn build(state: &GameState, schema: FeatureSchema) -> Self {
        let head = state.head();
        let mut values = vec![
            head.x as f64,
            head.y as f64,
            state.snake.len() as f64,
            state.food.x as f64,
            state.food.y as f64,
            state.horizontal_distance() as f64,
            state.vertical_distance() as f64,
            state.score as f64,
        ];

        let safe = safe_set(state);
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let safe_flags = [safe.left, safe.right, safe.up, safe.down].map(flag);

        match schema {
            FeatureSchema::Basic => {}
            FeatureSchema::Safety => {
                values.push(state.snake.len() as f64);
                values.extend(safe_flags);
            }
            FeatureSchema::Full => {
                values.extend(safe_flags);
                for direction in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
                    values.push(body_distance(state, direction) as f64);
                }
                values.extend(food_flags(state).map(flag));
            }
        }

        debug_assert_eq!(values.len(), schema.len());
        Self { schema, values }
    }

    /// Wrap raw values. Returns `None` if the length does not match the schema.
    pub fn from_values(schema: FeatureSchema, values: Vec<f64>) -> Option<Self> {
        (values.len() == schema.len()).then_some(Self { schema, values })
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.index_of(name).map(|i| self.values[i])
    }
}

/// Distance from the head to the nearest body segment straight ahead in `direction`.
///
/// Only segments on the head's row (LEFT/RIGHT) or column (UP/DOWN) count.
/// Defaults to the frame width when there is none.
pub fn body_distance(state: &GameState, direction: Direction) -> i32 {
    let head = state.head();
    state
        .snake
        .body_segments()
        .iter()
        .filter_map(|seg| match direction {
            Direction::Left if seg.y == head.y && seg.x < head.x => Some(head.x - seg.x),
            Direction::Right if seg.y == head.y && seg.x > head.x => Some(seg.x - head.x),
            Direction::Up if seg.x == head.x && seg.y < head.y => Some(head.y - seg.y),
            Direction::Down if seg.x == head.x && seg.y > head.y => Some(seg.y - head.y),
            _ => None,
        })
        .min()
        .unwrap_or(state.frame_width)
}

/// food_in_row, food_in_col, food_in_up, food_in_down, food_in_left, food_in_right
pub fn food_flags(state: &GameState) -> [bool; 6] {
    let head = state.head();
    let food = state.food;
    [
        food.y == head.y,
        food.x == head.x,
        food.y < head.y,
        food.y > head.y,
        food.x < head.x,
        food.x > head.x,
    ]
}
