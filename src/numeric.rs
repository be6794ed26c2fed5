pub(crate) mod quadrature;
