//! Single-dispatch interpretation of shapes.
//!
//! A visitor has one handler per shape variant and no default bodies, so a
//! visitor that forgets a variant does not compile. Recursive handlers get
//! the child shapes plus the `root` visitor of the current interpretation and
//! recurse through `root`, not `self`. A decorator that wraps another visitor
//! and replaces one handler therefore still sees every nested occurrence of
//! the variant it overrides.
use crate::shape::{DynamicKind, RecordShape, Shape};

/// Visitor as seen by recursive handlers.
pub type Root<'a, O> = dyn ShapeVisitor<Output = O> + 'a;

pub trait ShapeVisitor {
    type Output;

    fn dynamic_shape(&self, kind: DynamicKind) -> Self::Output;
    fn binary_shape(&self) -> Self::Output;
    fn bool_shape(&self) -> Self::Output;
    fn number_shape(&self) -> Self::Output;
    fn nothing_shape(&self) -> Self::Output;
    fn string_shape(&self) -> Self::Output;
    fn timestamp_shape(&self) -> Self::Output;
    fn array_shape(&self, element: &Shape, root: &Root<'_, Self::Output>) -> Self::Output;
    fn set_shape(&self, element: &Shape, root: &Root<'_, Self::Output>) -> Self::Output;
    fn map_shape(&self, value: &Shape, root: &Root<'_, Self::Output>) -> Self::Output;
    fn record_shape(&self, record: &RecordShape, root: &Root<'_, Self::Output>) -> Self::Output;
}

impl Shape {
    /// Interprets this shape with `visitor`, which also becomes the root for
    /// every nested shape.
    pub fn visit<O>(&self, visitor: &Root<'_, O>) -> O {
        match self {
            Shape::Dynamic(kind) => visitor.dynamic_shape(*kind),
            Shape::Binary => visitor.binary_shape(),
            Shape::Bool => visitor.bool_shape(),
            Shape::Number => visitor.number_shape(),
            Shape::Nothing => visitor.nothing_shape(),
            Shape::String => visitor.string_shape(),
            Shape::Timestamp => visitor.timestamp_shape(),
            Shape::Array(element) => visitor.array_shape(element, visitor),
            Shape::Set(element) => visitor.set_shape(element, visitor),
            Shape::Map(value) => visitor.map_shape(value, visitor),
            Shape::Record(record) => visitor.record_shape(record, visitor),
        }
    }
}
