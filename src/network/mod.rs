pub mod construction;
pub mod feed_forward;

pub use self::construction::LinearBuilder;

use crate::error::{Error, Result};
use crate::initializer::Initializer;
use crate::layers::{check_param_dims, Layer, LayerFunc};
use crate::math::{Matrix, Tensor};
use crate::mechanics::{MechIndex, MechNetworkIndex, Mechanics};
use crate::trainer::NetworkParams;

/// A feed forward network: an ordered sequence of layers where layer 0 is the input layer.
///
/// The sizes of the layers form the topology `[n0, n1, ..., nL]`; layer `i` is fed by the
/// `n(i-1)` neurons of the layer before it. The input layer is never trained.
#[derive(Clone, Debug)]
pub struct NeuralNetwork {
    layers: Vec<Layer>,
}

impl NeuralNetwork {
    /// Builds a network of the given topology with identity activations and no loss, with
    /// every weight and bias past the input layer drawn from `init`.
    pub fn new<I: Initializer>(topology: &[usize], init: I) -> Result<Self> {
        let (first, rest) = topology.split_first().ok_or(Error::EmptyNetwork)?;
        rest.iter()
            .fold(LinearBuilder::new(*first), |b, size| {
                b.layer(*size, Mechanics::default())
            })
            .build(init)
    }

    /// Assembles a network out of existing layers, keeping their parameters.
    ///
    /// Fails if the first layer isn't the only input layer, if any layer is empty or if a
    /// layer's previous size doesn't match the size of the layer before it.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self> {
        validate(&layers)?;
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, i: usize) -> Option<&Layer> {
        self.layers.get(i)
    }

    pub fn input_layer(&self) -> &Layer {
        &self.layers[0]
    }

    pub fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    /// Size of every layer, input layer first.
    pub fn topology(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.size()).collect()
    }

    /// Input size of the network.
    pub fn in_size(&self) -> usize {
        self.input_layer().size()
    }

    /// Output size of the network.
    pub fn out_size(&self) -> usize {
        self.output_layer().size()
    }

    /// Overrides the mechanics of individual neurons.
    pub fn set_mechanics(&mut self, mechs: &[MechNetworkIndex]) -> Result<&mut Self> {
        let len = self.layers.len();
        for m in mechs {
            self.layers
                .get_mut(m.layer)
                .ok_or(Error::IndexOutOfBounds {
                    index: m.layer,
                    len,
                })?
                .set_mechanics(std::slice::from_ref(&m.mech_index))?;
        }
        Ok(self)
    }

    /// Overrides the mechanics of whole layers, `MechIndex::i` being the layer index.
    pub fn set_dense_mechanics(&mut self, mechs: &[MechIndex]) -> Result<&mut Self> {
        let len = self.layers.len();
        for m in mechs {
            self.layers
                .get_mut(m.i)
                .ok_or(Error::IndexOutOfBounds { index: m.i, len })?
                .set_dense_mechanics(m.mechanics.clone());
        }
        Ok(self)
    }

    /// Redraws every weight and bias past the input layer from `init`. The input layer is zeroed.
    ///
    /// Everything is drawn before anything is written: if `init` can't supply every value the
    /// network is left untouched.
    pub fn reset<I: Initializer>(&mut self, mut init: I) -> Result<()> {
        let (weights, biases): (Vec<_>, Vec<_>) = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| {
                let (size, in_size) = (layer.size(), layer.in_size());
                if i == 0 {
                    (Matrix::zeros(size, in_size), Matrix::zeros(size, 1))
                } else {
                    (
                        layer.weights().map(|_| init.get(in_size, size)),
                        layer.biases().map(|_| init.bias(in_size, size)),
                    )
                }
            })
            .unzip();
        init.finish()?;

        let params = NetworkParams::new(Tensor::new(weights), Tensor::new(biases))?;
        self.check_params(&params)?;
        for (i, layer) in self.layers.iter_mut().enumerate() {
            if let Some((w, b)) = params.layer(i) {
                layer.set_params(w, b)?;
            }
        }
        Ok(())
    }

    /// Snapshot of the current weights and biases.
    pub fn params(&self) -> NetworkParams {
        let weights = Tensor::new(self.layers.iter().map(|l| l.weights()).collect());
        let biases = Tensor::new(self.layers.iter().map(|l| l.biases()).collect());
        NetworkParams::from_parts(weights, biases)
    }

    /// Installs a parameter snapshot. Every slot is checked before anything is written, so
    /// on error the network is left untouched. The input layer's slot is checked but ignored.
    pub fn install(&mut self, params: &NetworkParams) -> Result<()> {
        self.check_params(params)?;
        for (i, layer) in self.layers.iter_mut().enumerate().skip(1) {
            if let Some((w, b)) = params.layer(i) {
                layer.set_params(w, b)?;
            }
        }
        Ok(())
    }

    fn check_params(&self, params: &NetworkParams) -> Result<()> {
        if params.len() != self.layers.len() {
            return Err(Error::mismatch(
                "NeuralNetwork::install",
                crate::error::Dims::Slots(self.layers.len()),
                params.dims(),
            ));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            let (w, b) = params
                .layer(i)
                .ok_or(Error::IndexOutOfBounds {
                    index: i,
                    len: params.len(),
                })?;
            check_param_dims(layer.size(), layer.in_size(), w, b)?;
        }
        Ok(())
    }
}

fn validate(layers: &[Layer]) -> Result<()> {
    let (first, rest) = layers.split_first().ok_or(Error::EmptyNetwork)?;
    if !first.is_input() {
        return Err(Error::MisplacedInput { layer: 0 });
    }
    if first.size() == 0 {
        return Err(Error::EmptyLayer { layer: 0 });
    }
    let mut prev = first.size();
    for (i, l) in rest.iter().enumerate() {
        let index = i + 1;
        if l.is_input() {
            return Err(Error::MisplacedInput { layer: index });
        }
        if l.size() == 0 {
            return Err(Error::EmptyLayer { layer: index });
        }
        if l.in_size() != prev {
            return Err(Error::Topology {
                layer: index,
                expected: l.in_size(),
                found: prev,
            });
        }
        prev = l.size();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a_funcs::Sigmoid;
    use crate::initializer::{Ones, UniformInit, WeightInit};
    use crate::loss::SquaredError;

    #[test]
    fn shapes_follow_topology() {
        let nn = NeuralNetwork::new(&[3, 5, 2], UniformInit::new()).unwrap();
        assert_eq!(nn.topology(), vec![3, 5, 2]);

        let params = nn.params();
        assert_eq!(params.len(), 3);
        for (i, (rows, cols)) in [(3, 0), (5, 3), (2, 5)].iter().enumerate() {
            let (w, b) = params.layer(i).unwrap();
            assert_eq!((w.rows(), w.cols()), (*rows, *cols));
            assert_eq!((b.rows(), b.cols()), (*rows, 1));
        }
    }

    #[test]
    fn input_layer_is_zeroed() {
        let nn = NeuralNetwork::new(&[2, 2], Ones).unwrap();
        let (_, b0) = nn.params().layer(0).map(|(w, b)| (w.clone(), b.clone())).unwrap();
        assert!(b0.as_slice().iter().all(|b| *b == 0.));
        let (w1, b1) = nn.params().layer(1).map(|(w, b)| (w.clone(), b.clone())).unwrap();
        assert!(w1.as_slice().iter().chain(b1.as_slice()).all(|x| *x == 1.));
    }

    #[test]
    fn same_seed_same_network() {
        let a = NeuralNetwork::new(&[2, 4, 1], UniformInit::with_seed(3)).unwrap();
        let b = NeuralNetwork::new(&[2, 4, 1], UniformInit::with_seed(3)).unwrap();
        assert_eq!(a.params(), b.params());
    }

    #[test]
    fn topology_violations() {
        assert_eq!(NeuralNetwork::new(&[], Ones).err(), Some(Error::EmptyNetwork));
        assert_eq!(
            NeuralNetwork::new(&[2, 0, 1], Ones).err(),
            Some(Error::EmptyLayer { layer: 1 })
        );

        let layers = vec![
            Layer::input(2),
            Layer::dense(3, 2, Mechanics::default()),
            Layer::dense(1, 4, Mechanics::default()),
        ];
        assert_eq!(
            NeuralNetwork::from_layers(layers).err(),
            Some(Error::Topology {
                layer: 2,
                expected: 4,
                found: 3
            })
        );

        let layers = vec![Layer::dense(3, 2, Mechanics::default())];
        assert_eq!(
            NeuralNetwork::from_layers(layers).err(),
            Some(Error::MisplacedInput { layer: 0 })
        );

        let layers = vec![Layer::input(2), Layer::input(2)];
        assert_eq!(
            NeuralNetwork::from_layers(layers).err(),
            Some(Error::MisplacedInput { layer: 1 })
        );
    }

    #[test]
    fn install_round_trip() {
        let mut nn = NeuralNetwork::new(&[2, 3, 1], UniformInit::new()).unwrap();
        let doubled = nn.params().scale(2.);
        nn.install(&doubled).unwrap();
        assert_eq!(nn.params(), doubled);
    }

    #[test]
    fn install_checks_every_slot_first() {
        let mut nn = NeuralNetwork::new(&[2, 3, 1], UniformInit::new()).unwrap();
        let before = nn.params();
        let other = NeuralNetwork::new(&[2, 3, 2], UniformInit::new()).unwrap();
        assert!(nn.install(&other.params()).is_err());
        assert_eq!(nn.params(), before);

        let short = NeuralNetwork::new(&[2, 3], UniformInit::new()).unwrap();
        assert!(nn.install(&short.params()).is_err());
    }

    #[test]
    fn reset_redraws_everything() {
        let mut nn = NeuralNetwork::new(&[1, 2, 1], Ones).unwrap();
        nn.reset(WeightInit::new((1..=7).map(f64::from))).unwrap();
        let params = nn.params();
        let (w1, b1) = params.layer(1).unwrap();
        assert_eq!(w1.as_slice(), &[1., 2.]);
        assert_eq!(b1.as_slice(), &[3., 4.]);
        let (w2, b2) = params.layer(2).unwrap();
        assert_eq!(w2.as_slice(), &[5., 6.]);
        assert_eq!(b2.as_slice(), &[7.]);
    }

    #[test]
    fn reset_short_of_values_leaves_network_untouched() {
        let mut nn = NeuralNetwork::new(&[1, 2, 1], Ones).unwrap();
        let before = nn.params();
        assert_eq!(
            nn.reset(WeightInit::new(vec![9., 9., 9.])),
            Err(Error::OutOfValues { missing: 4 })
        );
        assert_eq!(nn.params(), before);
    }

    #[test]
    fn mechanics_assignment() {
        let mut nn = NeuralNetwork::new(&[1, 2, 1], Ones).unwrap();
        nn.set_dense_mechanics(&[MechIndex::new(2, Mechanics::new(Sigmoid, SquaredError))])
            .unwrap()
            .set_mechanics(&[MechNetworkIndex::new(1, 0, Mechanics::new(Sigmoid, SquaredError))])
            .unwrap();

        let out = nn.output_layer();
        assert!(matches!(
            out.standard_mechanics().loss,
            crate::loss::Loss::SquaredError(_)
        ));
        let hidden = nn.layer(1).unwrap().actual_mechanics();
        assert!(matches!(hidden[0].activation, crate::a_funcs::Activation::Sigmoid(_)));
        assert!(matches!(hidden[1].activation, crate::a_funcs::Activation::Identity(_)));

        assert!(nn
            .set_mechanics(&[MechNetworkIndex::new(3, 0, Mechanics::default())])
            .is_err());
        assert!(nn
            .set_mechanics(&[MechNetworkIndex::new(1, 2, Mechanics::default())])
            .is_err());
    }
}
