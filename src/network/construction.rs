use super::NeuralNetwork;
use crate::error::Result;
use crate::initializer::Initializer;
use crate::layers::{Layer, LayerFunc, Neuron};
use crate::mechanics::Mechanics;

/// Builder for networks where every layer is fed by the one before it.
///
/// ```
/// # use rusty_backprop::{a_funcs::Sigmoid, loss::SquaredError, mechanics::Mechanics};
/// # use rusty_backprop::{initializer::XavierInit, network::LinearBuilder};
/// let network = LinearBuilder::new(2)
///     .layer(3, Mechanics::new(Sigmoid, SquaredError))
///     .layer(1, Mechanics::new(Sigmoid, SquaredError))
///     .build(XavierInit::new())
///     .unwrap();
/// assert_eq!(network.topology(), vec![2, 3, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct LinearBuilder {
    layers: Vec<Layer>,
}

impl LinearBuilder {
    /// Starts a network with an input layer of `in_size` neurons.
    pub fn new(in_size: usize) -> Self {
        LinearBuilder {
            layers: vec![Layer::input(in_size)],
        }
    }

    fn last_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size())
    }

    /// Adds a dense layer where every neuron uses `mechanics`.
    pub fn layer(mut self, size: usize, mechanics: Mechanics) -> Self {
        let in_size = self.last_size();
        self.layers.push(Layer::dense(size, in_size, mechanics));
        self
    }

    /// Adds a dense layer with one neuron per entry of `mechanics`.
    pub fn layer_per_neuron(mut self, mechanics: Vec<Mechanics>) -> Self {
        let in_size = self.last_size();
        self.layers.push(Layer::dense_per_neuron(in_size, mechanics));
        self
    }

    /// Adds a dense layer out of explicitly provided neurons, keeping their parameters.
    pub fn layer_from_neurons(mut self, neurons: Vec<Neuron>, mechanics: Mechanics) -> Result<Self> {
        let in_size = self.last_size();
        self.layers
            .push(Layer::from_neurons(neurons, in_size, mechanics)?);
        Ok(self)
    }

    /// Adds all of the provided `(size, mechanics)` layers.
    pub fn layers<T>(mut self, layers: T) -> Self
    where
        T: IntoIterator<Item = (usize, Mechanics)>,
    {
        for (size, mechanics) in layers {
            self = self.layer(size, mechanics);
        }
        self
    }

    /// Builds the network, drawing every parameter from `init`.
    pub fn build<I: Initializer>(self, init: I) -> Result<NeuralNetwork> {
        let mut network = NeuralNetwork::from_layers(self.layers)?;
        network.reset(init)?;
        Ok(network)
    }

    /// Builds the network keeping the parameters the layers already hold.
    pub fn build_as_is(self) -> Result<NeuralNetwork> {
        NeuralNetwork::from_layers(self.layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a_funcs::Sigmoid;
    use crate::error::Error;
    use crate::initializer::{Ones, WeightInit};
    use crate::loss::SquaredError;

    #[test]
    fn chains_sizes() {
        let nn = LinearBuilder::new(4)
            .layers(vec![(3, Mechanics::default()), (2, Mechanics::default())])
            .layer_per_neuron(vec![Mechanics::new(Sigmoid, SquaredError); 5])
            .build(Ones)
            .unwrap();
        assert_eq!(nn.topology(), vec![4, 3, 2, 5]);
        assert_eq!(nn.layer(3).unwrap().in_size(), 2);
    }

    #[test]
    fn weights_are_consumed_in_order() {
        // two weights of layer 1, its bias, then the weight and bias of layer 2
        let nn = LinearBuilder::new(2)
            .layer(1, Mechanics::default())
            .layer(1, Mechanics::default())
            .build(WeightInit::new(vec![1., 2., 3., 4., 5.]))
            .unwrap();
        let params = nn.params();
        let (w1, b1) = params.layer(1).unwrap();
        assert_eq!(w1.as_slice(), &[1., 2.]);
        assert_eq!(b1.as_slice(), &[3.]);
        let (w2, b2) = params.layer(2).unwrap();
        assert_eq!(w2.as_slice(), &[4.]);
        assert_eq!(b2.as_slice(), &[5.]);
    }

    #[test]
    fn too_few_weights() {
        let res = LinearBuilder::new(2)
            .layer(1, Mechanics::default())
            .build(WeightInit::new(vec![1., 2.]));
        assert_eq!(res.err(), Some(Error::OutOfValues { missing: 1 }));
    }

    #[test]
    fn explicit_neurons() {
        let neurons = vec![Neuron::with_params(vec![0.5], 0., Mechanics::default())];
        let nn = LinearBuilder::new(1)
            .layer_from_neurons(neurons, Mechanics::default())
            .unwrap()
            .build_as_is()
            .unwrap();
        assert_eq!(nn.params().layer(1).unwrap().0.as_slice(), &[0.5]);

        let neurons = vec![Neuron::with_params(vec![0.5, 1.], 0., Mechanics::default())];
        let res = LinearBuilder::new(1).layer_from_neurons(neurons, Mechanics::default());
        assert!(matches!(res, Err(Error::NeuronShape { .. })));
    }
}
