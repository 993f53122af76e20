//! Sparse matrix structures
//!
//! Matrices are assembled as coordinate triplets ([`TripletMatrix`]) and then
//! compressed into CSR ([`CsrMatrix`]) for matrix-vector products.
//! [`SparseMatrix`] wraps both states behind one type.

mod csr;
mod matrix;
mod triplet;

pub use csr::CsrMatrix;
pub use matrix::SparseMatrix;
pub use triplet::TripletMatrix;
