use crate::error::{Error, Result};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

//I used this blog post as reference to the initialization methods ->
//https://towardsdatascience.com/weight-initialization-in-neural-networks-a-journey-from-the-basics-to-kaiming-954fb9b47c79

/// Implement Initializer for the struct reference as well
macro_rules! impl_ref {
    ($struct:ty) => {
        impl Initializer for &mut $struct {
            fn get(&mut self, in_size: usize, size: usize) -> f64 {
                <$struct as Initializer>::get(self, in_size, size)
            }
            fn bias(&mut self, in_size: usize, size: usize) -> f64 {
                <$struct as Initializer>::bias(self, in_size, size)
            }
            fn finish(&mut self) -> Result<()> {
                <$struct as Initializer>::finish(self)
            }
        }
    };
}

/// Source of starting values for a layer's parameters. `in_size` is the size of the previous
/// layer and `size` the size of the layer being initialized.
pub trait Initializer {
    /// Value of a single weight.
    fn get(&mut self, in_size: usize, size: usize) -> f64;

    /// Value of a single bias. Defaults to drawing it the same way as a weight.
    fn bias(&mut self, in_size: usize, size: usize) -> f64 {
        self.get(in_size, size)
    }

    /// Called once every parameter of a network has been drawn. The drawn values are only
    /// used if this succeeds.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Uniformly distributed values in `[0, 1)`.
pub struct UniformInit {
    rng: SmallRng,
}
impl UniformInit {
    pub fn new() -> UniformInit {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> UniformInit {
        UniformInit {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}
impl Default for UniformInit {
    fn default() -> Self {
        Self::new()
    }
}
impl Initializer for UniformInit {
    fn get(&mut self, _: usize, _: usize) -> f64 {
        self.rng.gen::<f64>()
    }
}
impl_ref!(UniformInit);

///Xavier initialization should be used for layers with symetric activation functions such as sigmoid or tanH
pub struct XavierInit {
    rng: SmallRng,
}
impl XavierInit {
    pub fn new() -> XavierInit {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> XavierInit {
        XavierInit {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}
impl Default for XavierInit {
    fn default() -> Self {
        Self::new()
    }
}
impl Initializer for XavierInit {
    fn get(&mut self, in_size: usize, _size: usize) -> f64 {
        self.rng.sample::<f64, _>(StandardNormal) / (in_size as f64).sqrt()
    }
}
impl_ref!(XavierInit);

///Kaiming initialization should be used for layers with asymetric activation functions such as RELU
pub struct KaimingInit {
    rng: SmallRng,
}
impl KaimingInit {
    pub fn new() -> KaimingInit {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> KaimingInit {
        KaimingInit {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}
impl Default for KaimingInit {
    fn default() -> Self {
        Self::new()
    }
}
impl Initializer for KaimingInit {
    fn get(&mut self, in_size: usize, _: usize) -> f64 {
        self.rng.sample::<f64, _>(StandardNormal) * (2. / (in_size as f64)).sqrt()
    }
}
impl_ref!(KaimingInit);

///Always initializes weights and biases to one
pub struct Ones;
impl Initializer for Ones {
    fn get(&mut self, _: usize, _: usize) -> f64 {
        1.
    }
}
impl_ref!(Ones);

/// This initializer accepts an iterator over f64 values and uses them to initialize the parameters.
/// Layers are filled in order, each one weights first (row by row) and then biases.
/// Running out of values is reported by [finish](Initializer::finish) as
/// [Error::OutOfValues], the network is left untouched in that case.
pub struct WeightInit<T: Iterator<Item = f64>> {
    iter: T,
    missing: usize,
}
impl<I: Iterator<Item = f64>> WeightInit<I> {
    pub fn new<T: IntoIterator<Item = f64, IntoIter = I>>(weights: T) -> Self {
        Self {
            iter: weights.into_iter(),
            missing: 0,
        }
    }
}

impl<I: Iterator<Item = f64>> Initializer for WeightInit<I> {
    fn get(&mut self, _in_size: usize, _size: usize) -> f64 {
        self.iter.next().unwrap_or_else(|| {
            self.missing += 1;
            0.
        })
    }

    fn finish(&mut self) -> Result<()> {
        match std::mem::take(&mut self.missing) {
            0 => Ok(()),
            missing => Err(Error::OutOfValues { missing }),
        }
    }
}

impl<I: Iterator<Item = f64>> Initializer for &mut WeightInit<I> {
    fn get(&mut self, in_size: usize, size: usize) -> f64 {
        (*self).get(in_size, size)
    }

    fn finish(&mut self) -> Result<()> {
        (*self).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_initializers_repeat() {
        let mut a = XavierInit::with_seed(7);
        let mut b = XavierInit::with_seed(7);
        for _ in 0..10 {
            assert_eq!(a.get(3, 2), b.get(3, 2));
        }
    }

    #[test]
    fn uniform_range() {
        let mut init = UniformInit::new();
        for _ in 0..100 {
            let x = init.get(1, 1);
            assert!((0. ..1.).contains(&x));
        }
    }

    #[test]
    fn weight_init_in_order() {
        let mut init = WeightInit::new(vec![1., 2., 3.]);
        assert_eq!(init.get(0, 0), 1.);
        assert_eq!(init.bias(0, 0), 2.);
        assert_eq!((&mut init).get(0, 0), 3.);
        assert_eq!(init.finish(), Ok(()));
    }

    #[test]
    fn weight_init_reports_shortfall() {
        let mut init = WeightInit::new(vec![1.]);
        assert_eq!(init.get(0, 0), 1.);
        init.get(0, 0);
        init.bias(0, 0);
        assert_eq!((&mut init).finish(), Err(Error::OutOfValues { missing: 2 }));
        // the count starts over once reported
        assert_eq!(init.finish(), Ok(()));
    }
}
