//! Builtin vocabulary seeded into every classification pass, plus the
//! semantic token legend advertised to clients.
//!
//! These tables are process-wide, read-only configuration. The classifier
//! never mutates them; it clones what it needs into pass-local working tables.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;

/// Semantic token types, in legend order. `type_index` on the wire is a
/// position in this array; unclassified tokens use the sentinel value
/// `TOKEN_TYPES.len()`.
pub const TOKEN_TYPES: &[&str] = &[
    "namespace",
    "type",
    "class",
    "function",
    "variable",
    "parameter",
    "property",
    "method",
    "keyword",
    "modifier",
    "operator",
    "string",
    "number",
    "comment",
];

/// Semantic token modifiers, in legend order. The wire bitmask sets bit `i`
/// for the modifier at position `i`.
pub const TOKEN_MODIFIERS: &[&str] = &[
    "declaration",
    "definition",
    "readonly",
    "static",
    "deprecated",
    "defaultLibrary",
];

/// Keywords are never highlighted by the classifier (the editor's native
/// keyword coloring wins) but they drive its table updates.
pub static KEYWORDS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        "for", "if", "else", "elif", "while", "return", "import", "from", "as", "try", "except",
        "finally", "with", "yield", "def", "class", "lambda", "assert", "break", "continue",
        "pass", "global", "nonlocal", "del", "raise", "in", "is", "not", "and", "or", "True",
        "False", "None", "self", "async", "await",
    ]
    .into_iter()
    .collect()
});

/// Callable names from the SageMath standard library.
pub static FUNCTIONS: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    [
        // Basic arithmetic
        "GCD", "gcd", "LCM", "lcm", "xgcd", "crt", "factor", "prime_factors", "divisors",
        "is_prime", "next_prime", "previous_prime", "nth_prime", "prime_range", "primes",
        "factorial", "binomial", "fibonacci", "lucas_number1",
        // Number theory
        "euler_phi", "moebius", "sigma", "kronecker", "legendre_symbol", "jacobi_symbol",
        "quadratic_residues", "primitive_root", "order_from_multiple", "discrete_log",
        "power_mod", "inverse_mod", "mod", "Mod",
        // Algebraic operations
        "expand", "simplify", "simplify_full", "collect", "combine", "radsimp", "ratsimp",
        "trigsimp", "powsimp", "logcombine",
        // Calculus
        "diff", "derivative", "integrate", "integral", "limit", "taylor", "series", "laplace",
        "inverse_laplace", "fourier", "inverse_fourier",
        // Solving equations
        "solve", "solve_mod", "roots", "real_roots", "complex_roots", "find_root",
        "find_local_minimum", "find_local_maximum",
        // Linear algebra
        "matrix", "Matrix", "vector", "identity_matrix", "zero_matrix", "ones_matrix",
        "diagonal_matrix", "block_matrix", "block_diagonal_matrix", "random_matrix",
        "elementary_matrix", "companion_matrix", "jordan_block",
        // Polynomials
        "poly", "degree", "coefficients", "resultant", "discriminant", "content",
        "primitive_part", "squarefree_decomposition",
        // Combinatorics
        "permutations", "combinations", "arrangements", "derangements", "partitions",
        "Partitions", "compositions", "catalan_number", "bell_number", "bernoulli",
        "stirling_number1", "stirling_number2",
        // Graph theory
        "Graph", "DiGraph", "graphs", "digraphs",
        // Number fields and rings
        "NumberField", "QuadraticField", "CyclotomicField", "FunctionField", "FractionField",
        // Cryptography
        "bytes_to_long", "long_to_bytes", "random_prime", "is_prime_power",
        // Elliptic curves
        "EllipticCurve", "EllipticCurve_from_j",
        // Lattices
        "IntegerLattice", "FreeModule",
        // Plotting
        "plot", "list_plot", "scatter_plot", "line", "circle", "polygon", "parametric_plot",
        "polar_plot", "implicit_plot", "contour_plot", "plot3d", "implicit_plot3d",
        "parametric_plot3d",
        // Symbolic
        "var", "assume", "forget", "assumptions", "symbolic_expression", "SR", "Expression",
        // Utilities
        "show", "pretty_print", "latex", "html", "save", "load", "randint", "random",
        "set_random_seed", "ceil", "floor", "round", "abs", "sign", "sqrt", "log", "ln", "exp",
        "sin", "cos", "tan", "arcsin", "arccos", "arctan", "sinh", "cosh", "tanh", "pi", "e",
        "I", "oo", "infinity",
        // Type conversions
        "int", "float", "complex", "Integer", "Rational", "RealNumber", "ComplexNumber",
        "RealField", "ComplexField",
        // Pari/GP interface
        "pari", "gp",
    ]
    .into_iter()
    .collect()
});

/// Builtin classes mapped to their known method names. Properties are not
/// predefined for builtins; only user code adds properties.
pub static CLASSES: Lazy<BTreeMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let entries: &[(&str, &[&str])] = &[
        // Base rings
        ("ZZ", &["quo", "random_element", "ideal", "fraction_field"]),
        ("QQ", &["random_element", "algebraic_closure"]),
        ("RR", &["random_element", "precision"]),
        ("CC", &["random_element", "precision"]),
        ("RDF", &["random_element"]),
        ("CDF", &["random_element"]),
        ("RIF", &[]),
        ("CIF", &[]),
        // Modular arithmetic
        ("Zmod", &["order", "unit_group", "random_element"]),
        ("IntegerModRing", &["order", "unit_group", "random_element"]),
        (
            "GF",
            &[
                "order",
                "characteristic",
                "degree",
                "gen",
                "random_element",
                "multiplicative_generator",
            ],
        ),
        ("FiniteField", &["order", "characteristic", "degree", "gen", "random_element"]),
        // Polynomial rings
        ("PolynomialRing", &["gen", "gens", "ngens", "random_element", "ideal", "quo"]),
        (
            "Polynomial",
            &[
                "degree",
                "coefficients",
                "roots",
                "factor",
                "gcd",
                "lcm",
                "derivative",
                "integral",
                "resultant",
                "discriminant",
                "is_irreducible",
                "is_squarefree",
            ],
        ),
        // Ideals
        (
            "Ideal",
            &[
                "groebner_basis",
                "dimension",
                "variety",
                "reduce",
                "gens",
                "is_zero",
                "is_one",
                "is_prime",
                "is_maximal",
                "is_principal",
                "radical",
                "saturation",
            ],
        ),
        // Matrices
        (
            "Matrix",
            &[
                "nrows",
                "ncols",
                "det",
                "determinant",
                "trace",
                "rank",
                "nullity",
                "rows",
                "columns",
                "row",
                "column",
                "transpose",
                "T",
                "conjugate",
                "H",
                "inverse",
                "adjugate",
                "adjoint",
                "pseudoinverse",
                "solve_right",
                "solve_left",
                "right_kernel",
                "left_kernel",
                "kernel",
                "image",
                "eigenvalues",
                "eigenvectors_right",
                "eigenvectors_left",
                "eigenspaces_right",
                "eigenspaces_left",
                "characteristic_polynomial",
                "minimal_polynomial",
                "charpoly",
                "minpoly",
                "jordan_form",
                "rational_form",
                "smith_form",
                "hermite_form",
                "echelon_form",
                "LU",
                "QR",
                "SVD",
                "cholesky",
                "LLL",
                "BKZ",
                "gram_schmidt",
                "norm",
                "is_symmetric",
                "is_hermitian",
                "is_positive_definite",
                "is_square",
                "is_invertible",
                "is_singular",
                "augment",
                "stack",
                "submatrix",
                "matrix_from_rows",
                "matrix_from_columns",
                "change_ring",
                "base_ring",
                "dense_matrix",
                "sparse_matrix",
                "apply_map",
                "list",
                "dict",
            ],
        ),
        // Vectors and modules
        (
            "vector",
            &[
                "dot_product",
                "cross_product",
                "norm",
                "normalized",
                "inner_product",
                "outer_product",
                "pairwise_product",
            ],
        ),
        ("FreeModule", &["basis", "dimension", "gens", "submodule", "quotient"]),
        // Symbolic
        ("var", &[]),
        ("SR", &["var", "symbol"]),
        (
            "Expression",
            &[
                "simplify",
                "expand",
                "factor",
                "collect",
                "subs",
                "substitute",
                "diff",
                "derivative",
                "integrate",
                "limit",
                "series",
                "taylor",
                "solve",
                "roots",
                "real",
                "imag",
                "abs",
                "conjugate",
            ],
        ),
        // Number fields
        (
            "NumberField",
            &[
                "degree",
                "discriminant",
                "signature",
                "gen",
                "gens",
                "ring_of_integers",
                "class_number",
                "class_group",
                "unit_group",
                "units",
                "galois_group",
            ],
        ),
        ("QuadraticField", &["degree", "discriminant", "gen", "ring_of_integers"]),
        // Elliptic curves
        (
            "EllipticCurve",
            &[
                "order",
                "abelian_group",
                "gens",
                "rational_points",
                "lift_x",
                "a_invariants",
                "b_invariants",
                "c_invariants",
                "j_invariant",
                "discriminant",
                "is_singular",
                "is_supersingular",
                "is_ordinary",
                "point",
                "random_point",
                "points",
                "multiplication_by_m",
                "division_polynomial",
                "torsion_order",
                "torsion_points",
                "torsion_subgroup",
                "height",
                "height_pairing_matrix",
                "regulator",
                "rank",
                "saturation",
                "descent",
                "isogeny",
                "isogenies_prime_degree",
                "isogeny_class",
            ],
        ),
        // Groups
        ("AbelianGroup", &["order", "gens", "gen", "invariants", "is_cyclic"]),
        (
            "PermutationGroup",
            &["order", "gens", "gen", "degree", "orbits", "is_abelian", "is_cyclic", "is_transitive"],
        ),
        ("SymmetricGroup", &["order", "gens", "degree"]),
        ("CyclicPermutationGroup", &["order", "gen"]),
        ("DihedralGroup", &["order", "gens"]),
        // Graphs
        (
            "Graph",
            &[
                "vertices",
                "edges",
                "neighbors",
                "degree",
                "order",
                "size",
                "is_connected",
                "is_tree",
                "is_bipartite",
                "chromatic_number",
                "clique_number",
                "diameter",
                "shortest_path",
                "adjacency_matrix",
                "laplacian_matrix",
            ],
        ),
        (
            "DiGraph",
            &[
                "vertices",
                "edges",
                "in_degree",
                "out_degree",
                "order",
                "size",
                "is_connected",
                "strongly_connected_components",
                "topological_sort",
                "adjacency_matrix",
            ],
        ),
        // Power series
        ("PowerSeriesRing", &["gen", "default_prec"]),
        ("LaurentSeriesRing", &["gen"]),
        // Integers and rationals
        (
            "Integer",
            &[
                "factor",
                "divisors",
                "is_prime",
                "is_prime_power",
                "is_perfect_power",
                "sqrt",
                "nth_root",
                "digits",
                "binary",
                "bits",
                "nbits",
                "popcount",
            ],
        ),
        ("Rational", &["numerator", "denominator", "floor", "ceil", "round", "sign", "abs"]),
        // Sequences
        ("Sequence", &[]),
        ("OEIS", &["find_by_id", "find_by_sequence"]),
    ];
    entries.iter().copied().collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_sizes_are_stable() {
        assert_eq!(TOKEN_TYPES.len(), 14);
        assert_eq!(TOKEN_MODIFIERS.len(), 6);
        assert_eq!(TOKEN_MODIFIERS[2], "readonly");
    }

    #[test]
    fn classifier_kinds_appear_in_the_legend() {
        for kind in ["class", "function", "variable", "method", "operator"] {
            assert!(TOKEN_TYPES.contains(&kind));
        }
    }

    #[test]
    fn seed_tables_cover_the_core_vocabulary() {
        assert!(KEYWORDS.contains("def"));
        assert!(KEYWORDS.contains("self"));
        assert!(FUNCTIONS.contains("factor"));
        assert!(FUNCTIONS.contains("bytes_to_long"));
        let ring = CLASSES.get("PolynomialRing").copied().unwrap_or_default();
        assert!(ring.contains(&"gen"));
    }
}
