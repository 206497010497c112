/// Hyperbolic tangent, the only transfer function the network uses.
///
/// Output range is (-1, 1). Both propagation directions go through here:
/// `function` on the weighted input sum during the forward pass, and
/// `derivative` on the stored activation during backpropagation.
pub struct Tanh;

impl Tanh {
    pub fn function(x: f64) -> f64 {
        x.tanh()
    }

    /// d/dx tanh(x) expressed through the activation `a = tanh(x)`: `1 - a²`.
    ///
    /// Takes the activation, not the pre-activation sum, since that is what
    /// a neuron keeps after its forward step.
    pub fn derivative(activation: f64) -> f64 {
        1.0 - activation * activation
    }
}
