// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Operator forwarding for `StepFunctionMapping`, in the manner of the BigUint impl. The invocation site must have `StepFunctionMapping`, `Position` and the operator trait in scope.

// `$imp` between two mappings, forwarded to the by-reference inherent method `$inherent`.
macro_rules! forward_mapping_binop {
  ($imp:ident, $method:ident, $inherent:ident) => {
    impl<'a, 'b, P: Position> $imp<&'b StepFunctionMapping<P>> for &'a StepFunctionMapping<P> {
      type Output = StepFunctionMapping<P>;

      fn $method(self, other: &'b StepFunctionMapping<P>) -> StepFunctionMapping<P> {
        self.$inherent(other)
      }
    }

    impl<P: Position> $imp<StepFunctionMapping<P>> for StepFunctionMapping<P> {
      type Output = StepFunctionMapping<P>;

      fn $method(self, other: StepFunctionMapping<P>) -> StepFunctionMapping<P> {
        (&self).$method(&other)
      }
    }

    impl<'a, P: Position> $imp<StepFunctionMapping<P>> for &'a StepFunctionMapping<P> {
      type Output = StepFunctionMapping<P>;

      fn $method(self, other: StepFunctionMapping<P>) -> StepFunctionMapping<P> {
        self.$method(&other)
      }
    }

    impl<'b, P: Position> $imp<&'b StepFunctionMapping<P>> for StepFunctionMapping<P> {
      type Output = StepFunctionMapping<P>;

      fn $method(self, other: &'b StepFunctionMapping<P>) -> StepFunctionMapping<P> {
        (&self).$method(other)
      }
    }
  }
}

// `$imp<f64>` applied to every breakpoint value.
macro_rules! forward_scalar_binop {
  ($imp:ident, $method:ident, $inherent:ident) => {
    impl<'a, P: Position> $imp<f64> for &'a StepFunctionMapping<P> {
      type Output = StepFunctionMapping<P>;

      fn $method(self, scalar: f64) -> StepFunctionMapping<P> {
        self.$inherent(scalar)
      }
    }

    impl<P: Position> $imp<f64> for StepFunctionMapping<P> {
      type Output = StepFunctionMapping<P>;

      fn $method(self, scalar: f64) -> StepFunctionMapping<P> {
        (&self).$method(scalar)
      }
    }
  }
}
