//! Static documentation database backing hover and completion detail.
//!
//! Entries cover the most commonly used functions of the SageMath standard
//! library plus per-class method summaries. Everything is `'static` data;
//! lookups are linear over small slices so the tables stay plain constants
//! with a stable iteration order.

pub struct ParameterDoc {
    pub name: &'static str,
    pub ty: &'static str,
    pub description: &'static str,
    pub default: Option<&'static str>,
}

pub struct FunctionDoc {
    pub signature: &'static str,
    pub description: &'static str,
    pub params: &'static [ParameterDoc],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
}

pub struct MethodDoc {
    pub signature: &'static str,
    pub description: &'static str,
    pub returns: &'static str,
}

const fn param(
    name: &'static str,
    ty: &'static str,
    description: &'static str,
    default: Option<&'static str>,
) -> ParameterDoc {
    ParameterDoc {
        name,
        ty,
        description,
        default,
    }
}

pub static FUNCTION_DOCS: &[(&str, FunctionDoc)] = &[
    (
        "factor",
        FunctionDoc {
            signature: "factor(n, proof=None, int_=False, algorithm='pari', verbose=0)",
            description: "Return the factorization of n. The result depends on the type of n.",
            params: &[
                param("n", "integer/polynomial", "The object to factor", None),
                param("proof", "bool", "Whether to prove primality of factors", Some("None")),
                param("algorithm", "str", "Algorithm: 'pari', 'kash', 'magma'", Some("'pari'")),
            ],
            returns: "Factorization object",
            examples: &["factor(120)  # 2^3 * 3 * 5", "factor(x^4 - 1)"],
            category: "number_theory",
        },
    ),
    (
        "is_prime",
        FunctionDoc {
            signature: "is_prime(n, proof=None)",
            description: "Return True if n is a prime number, False otherwise.",
            params: &[
                param("n", "integer", "Number to test", None),
                param("proof", "bool", "Use provable test", Some("None")),
            ],
            returns: "bool",
            examples: &["is_prime(17)  # True", "is_prime(15)  # False"],
            category: "number_theory",
        },
    ),
    (
        "next_prime",
        FunctionDoc {
            signature: "next_prime(n, proof=None)",
            description: "Return the smallest prime greater than n.",
            params: &[param("n", "integer", "Starting number", None)],
            returns: "integer",
            examples: &["next_prime(10)  # 11"],
            category: "number_theory",
        },
    ),
    (
        "gcd",
        FunctionDoc {
            signature: "gcd(a, b=None)",
            description: "Return the greatest common divisor of a and b.",
            params: &[
                param("a", "integer/list", "First number or list", None),
                param("b", "integer", "Second number", Some("None")),
            ],
            returns: "integer",
            examples: &["gcd(12, 18)  # 6", "gcd([12, 18, 24])  # 6"],
            category: "number_theory",
        },
    ),
    (
        "lcm",
        FunctionDoc {
            signature: "lcm(a, b=None)",
            description: "Return the least common multiple of a and b.",
            params: &[
                param("a", "integer/list", "First number or list", None),
                param("b", "integer", "Second number", Some("None")),
            ],
            returns: "integer",
            examples: &["lcm(12, 18)  # 36"],
            category: "number_theory",
        },
    ),
    (
        "xgcd",
        FunctionDoc {
            signature: "xgcd(a, b)",
            description: "Extended GCD: return (g, s, t) such that g = gcd(a,b) = s*a + t*b.",
            params: &[
                param("a", "integer", "First number", None),
                param("b", "integer", "Second number", None),
            ],
            returns: "tuple (g, s, t)",
            examples: &["xgcd(12, 8)  # (4, 1, -1)"],
            category: "number_theory",
        },
    ),
    (
        "euler_phi",
        FunctionDoc {
            signature: "euler_phi(n)",
            description: "Return Euler's totient function φ(n).",
            params: &[param("n", "integer", "Positive integer", None)],
            returns: "integer",
            examples: &["euler_phi(12)  # 4"],
            category: "number_theory",
        },
    ),
    (
        "factorial",
        FunctionDoc {
            signature: "factorial(n, algorithm='gmp')",
            description: "Return n! = 1 * 2 * ... * n.",
            params: &[param("n", "integer", "Non-negative integer", None)],
            returns: "integer",
            examples: &["factorial(5)  # 120"],
            category: "number_theory",
        },
    ),
    (
        "crt",
        FunctionDoc {
            signature: "crt(remainders, moduli)",
            description: "Chinese Remainder Theorem: find x ≡ remainders[i] (mod moduli[i]).",
            params: &[
                param("remainders", "list", "List of remainders", None),
                param("moduli", "list", "List of moduli (pairwise coprime)", None),
            ],
            returns: "integer",
            examples: &["crt([2, 3, 2], [3, 5, 7])  # 23"],
            category: "cryptography",
        },
    ),
    (
        "inverse_mod",
        FunctionDoc {
            signature: "inverse_mod(a, m)",
            description: "Return b such that a*b ≡ 1 (mod m).",
            params: &[
                param("a", "integer", "Number to invert", None),
                param("m", "integer", "Modulus", None),
            ],
            returns: "integer",
            examples: &["inverse_mod(3, 7)  # 5"],
            category: "cryptography",
        },
    ),
    (
        "power_mod",
        FunctionDoc {
            signature: "power_mod(a, n, m)",
            description: "Return a^n mod m using fast exponentiation.",
            params: &[
                param("a", "integer", "Base", None),
                param("n", "integer", "Exponent", None),
                param("m", "integer", "Modulus", None),
            ],
            returns: "integer",
            examples: &["power_mod(2, 10, 1000)  # 24"],
            category: "cryptography",
        },
    ),
    (
        "discrete_log",
        FunctionDoc {
            signature: "discrete_log(a, base, ord=None, operation='*')",
            description: "Compute discrete log: find x such that base^x = a.",
            params: &[
                param("a", "element", "Target element", None),
                param("base", "element", "Base", None),
                param("ord", "integer", "Order of base", Some("None")),
            ],
            returns: "integer",
            examples: &["F = GF(101); discrete_log(F(2), F(3))"],
            category: "cryptography",
        },
    ),
    (
        "random_prime",
        FunctionDoc {
            signature: "random_prime(n, proof=None, lbound=2)",
            description: "Return a random prime p with lbound <= p <= n.",
            params: &[
                param("n", "integer", "Upper bound", None),
                param("lbound", "integer", "Lower bound", Some("2")),
            ],
            returns: "integer",
            examples: &["random_prime(2^256, lbound=2^255)"],
            category: "cryptography",
        },
    ),
    (
        "matrix",
        FunctionDoc {
            signature: "matrix(ring, nrows, ncols=None, entries=None, sparse=False)",
            description: "Create a matrix over the given ring.",
            params: &[
                param("ring", "Ring", "Base ring (ZZ, QQ, GF(p))", None),
                param("nrows", "integer", "Number of rows", None),
                param("ncols", "integer", "Number of columns", Some("None")),
                param("entries", "list", "Matrix entries", Some("None")),
            ],
            returns: "Matrix",
            examples: &["matrix(ZZ, 2, 2, [1,2,3,4])", "matrix(QQ, [[1,2],[3,4]])"],
            category: "linear_algebra",
        },
    ),
    (
        "vector",
        FunctionDoc {
            signature: "vector(ring, entries)",
            description: "Create a vector over the given ring.",
            params: &[
                param("ring", "Ring", "Base ring", None),
                param("entries", "list", "Vector entries", None),
            ],
            returns: "Vector",
            examples: &["vector(ZZ, [1, 2, 3])"],
            category: "linear_algebra",
        },
    ),
    (
        "identity_matrix",
        FunctionDoc {
            signature: "identity_matrix(ring, n, sparse=False)",
            description: "Return n x n identity matrix.",
            params: &[
                param("ring", "Ring", "Base ring", None),
                param("n", "integer", "Dimension", None),
            ],
            returns: "Matrix",
            examples: &["identity_matrix(ZZ, 3)"],
            category: "linear_algebra",
        },
    ),
    (
        "PolynomialRing",
        FunctionDoc {
            signature: "PolynomialRing(base_ring, names, order='degrevlex')",
            description: "Create polynomial ring over base_ring.",
            params: &[
                param("base_ring", "Ring", "Coefficient ring", None),
                param("names", "str/list", "Variable names", None),
            ],
            returns: "PolynomialRing",
            examples: &["R.<x> = PolynomialRing(QQ)", "R.<x,y> = PolynomialRing(ZZ)"],
            category: "algebra",
        },
    ),
    (
        "GF",
        FunctionDoc {
            signature: "GF(order, name='a', modulus=None)",
            description: "Create finite field of given order (prime power).",
            params: &[
                param("order", "integer", "Field order p^n", None),
                param("name", "str", "Generator name", Some("'a'")),
            ],
            returns: "FiniteField",
            examples: &["GF(7)", "GF(2^8)", "K.<a> = GF(2^8)"],
            category: "algebra",
        },
    ),
    (
        "Zmod",
        FunctionDoc {
            signature: "Zmod(n)",
            description: "Create ring of integers modulo n.",
            params: &[param("n", "integer", "Modulus", None)],
            returns: "IntegerModRing",
            examples: &["R = Zmod(12); R(7) + R(8)"],
            category: "algebra",
        },
    ),
    (
        "var",
        FunctionDoc {
            signature: "var(names)",
            description: "Create symbolic variables.",
            params: &[param("names", "str", "Variable names", None)],
            returns: "Symbolic variable(s)",
            examples: &["var('x')", "var('x y z')"],
            category: "symbolic",
        },
    ),
    (
        "solve",
        FunctionDoc {
            signature: "solve(f, *args, **kwds)",
            description: "Solve equations algebraically.",
            params: &[
                param("f", "equation/list", "Equation(s)", None),
                param("args", "variables", "Variables to solve for", None),
            ],
            returns: "list of solutions",
            examples: &["var('x'); solve(x^2 - 4 == 0, x)"],
            category: "symbolic",
        },
    ),
    (
        "expand",
        FunctionDoc {
            signature: "expand(expr)",
            description: "Expand expression by distributing products.",
            params: &[param("expr", "Expression", "Expression", None)],
            returns: "Expression",
            examples: &["var('x'); expand((x+1)^3)"],
            category: "symbolic",
        },
    ),
    (
        "diff",
        FunctionDoc {
            signature: "diff(f, *args)",
            description: "Compute derivative.",
            params: &[
                param("f", "Expression", "Function", None),
                param("args", "variables", "Differentiate w.r.t.", None),
            ],
            returns: "Expression",
            examples: &["var('x'); diff(x^3, x)  # 3*x^2"],
            category: "calculus",
        },
    ),
    (
        "integrate",
        FunctionDoc {
            signature: "integrate(f, *args)",
            description: "Compute integral.",
            params: &[
                param("f", "Expression", "Function", None),
                param("args", "variable/bounds", "Variable and bounds", None),
            ],
            returns: "Expression",
            examples: &["var('x'); integrate(x^2, x)  # x^3/3"],
            category: "calculus",
        },
    ),
    (
        "EllipticCurve",
        FunctionDoc {
            signature: "EllipticCurve(field, ainvs)",
            description: "Create elliptic curve. Essential for CTF crypto.",
            params: &[
                param("field", "Ring/list", "Base field or coefficients", None),
                param("ainvs", "list", "Weierstrass coefficients", None),
            ],
            returns: "EllipticCurve",
            examples: &["EllipticCurve(GF(101), [0, 7])", "E = EllipticCurve(QQ, [0,0,0,-1,0])"],
            category: "elliptic_curves",
        },
    ),
    (
        "sqrt",
        FunctionDoc {
            signature: "sqrt(x)",
            description: "Return square root of x.",
            params: &[param("x", "number", "Value", None)],
            returns: "number/Expression",
            examples: &["sqrt(4)  # 2", "sqrt(2).n()  # 1.414..."],
            category: "utility",
        },
    ),
    (
        "log",
        FunctionDoc {
            signature: "log(x, base=None)",
            description: "Return logarithm (default: natural log).",
            params: &[
                param("x", "number", "Value", None),
                param("base", "number", "Base", Some("None")),
            ],
            returns: "number/Expression",
            examples: &["log(e)  # 1", "log(100, 10)  # 2"],
            category: "utility",
        },
    ),
];

pub static METHOD_DOCS: &[(&str, &[(&str, MethodDoc)])] = &[
    (
        "Matrix",
        &[
            (
                "det",
                MethodDoc { signature: "det()", description: "Return determinant.", returns: "element" },
            ),
            (
                "inverse",
                MethodDoc { signature: "inverse()", description: "Return inverse matrix.", returns: "Matrix" },
            ),
            (
                "transpose",
                MethodDoc { signature: "transpose()", description: "Return transpose.", returns: "Matrix" },
            ),
            (
                "rank",
                MethodDoc { signature: "rank()", description: "Return rank.", returns: "integer" },
            ),
            (
                "solve_right",
                MethodDoc { signature: "solve_right(B)", description: "Solve A*X = B.", returns: "Matrix/Vector" },
            ),
            (
                "kernel",
                MethodDoc { signature: "kernel()", description: "Return kernel.", returns: "FreeModule" },
            ),
            (
                "eigenvalues",
                MethodDoc { signature: "eigenvalues()", description: "Return eigenvalues.", returns: "list" },
            ),
            (
                "charpoly",
                MethodDoc { signature: "charpoly(var='x')", description: "Return characteristic polynomial.", returns: "polynomial" },
            ),
            (
                "echelon_form",
                MethodDoc { signature: "echelon_form()", description: "Return echelon form.", returns: "Matrix" },
            ),
            (
                "LLL",
                MethodDoc { signature: "LLL(delta=0.99)", description: "LLL reduction for lattice attacks.", returns: "Matrix" },
            ),
            (
                "BKZ",
                MethodDoc { signature: "BKZ(block_size=10)", description: "BKZ reduction (stronger than LLL).", returns: "Matrix" },
            ),
        ],
    ),
    (
        "EllipticCurve",
        &[
            (
                "order",
                MethodDoc { signature: "order()", description: "Return curve order.", returns: "integer" },
            ),
            (
                "gens",
                MethodDoc { signature: "gens()", description: "Return generators.", returns: "list" },
            ),
            (
                "random_point",
                MethodDoc { signature: "random_point()", description: "Return random point.", returns: "Point" },
            ),
            (
                "lift_x",
                MethodDoc { signature: "lift_x(x)", description: "Find point with given x.", returns: "Point" },
            ),
            (
                "j_invariant",
                MethodDoc { signature: "j_invariant()", description: "Return j-invariant.", returns: "element" },
            ),
        ],
    ),
    (
        "Ideal",
        &[
            (
                "groebner_basis",
                MethodDoc { signature: "groebner_basis()", description: "Compute Gröbner basis.", returns: "list" },
            ),
            (
                "variety",
                MethodDoc { signature: "variety()", description: "Return variety.", returns: "list" },
            ),
            (
                "reduce",
                MethodDoc { signature: "reduce(f)", description: "Reduce f modulo ideal.", returns: "element" },
            ),
        ],
    ),
    (
        "PolynomialRing",
        &[
            (
                "gen",
                MethodDoc { signature: "gen()", description: "Return generator.", returns: "polynomial" },
            ),
            (
                "gens",
                MethodDoc { signature: "gens()", description: "Return all generators.", returns: "tuple" },
            ),
            (
                "ideal",
                MethodDoc { signature: "ideal(gens)", description: "Create ideal.", returns: "Ideal" },
            ),
        ],
    ),
    (
        "FiniteField",
        &[
            (
                "order",
                MethodDoc { signature: "order()", description: "Return field order.", returns: "integer" },
            ),
            (
                "gen",
                MethodDoc { signature: "gen()", description: "Return generator.", returns: "element" },
            ),
            (
                "multiplicative_generator",
                MethodDoc { signature: "multiplicative_generator()", description: "Return primitive root.", returns: "element" },
            ),
        ],
    ),
];

pub fn get_function_doc(name: &str) -> Option<&'static FunctionDoc> {
    FUNCTION_DOCS
        .iter()
        .find(|(doc_name, _)| *doc_name == name)
        .map(|(_, doc)| doc)
}

pub fn get_method_doc(class_name: &str, method_name: &str) -> Option<&'static MethodDoc> {
    let (_, methods) = METHOD_DOCS.iter().find(|(name, _)| *name == class_name)?;
    methods
        .iter()
        .find(|(name, _)| *name == method_name)
        .map(|(_, doc)| doc)
}

/// Formats function documentation as Markdown for hover display.
pub fn format_hover_markdown(name: &str, doc: &FunctionDoc) -> String {
    let mut lines = vec![
        format!("### {name}"),
        String::new(),
        "```python".to_string(),
        doc.signature.to_string(),
        "```".to_string(),
        String::new(),
        doc.description.to_string(),
        String::new(),
    ];

    if !doc.params.is_empty() {
        lines.push("**Parameters:**".to_string());
        for p in doc.params {
            let default = p
                .default
                .map(|d| format!(" (default: {d})"))
                .unwrap_or_default();
            lines.push(format!("- `{}` ({}): {}{}", p.name, p.ty, p.description, default));
        }
        lines.push(String::new());
    }

    lines.push(format!("**Returns:** {}", doc.returns));
    lines.push(String::new());

    if !doc.examples.is_empty() {
        lines.push("**Examples:**".to_string());
        lines.push("```python".to_string());
        lines.extend(doc.examples.iter().map(|e| e.to_string()));
        lines.push("```".to_string());
    }

    lines.join("\n")
}

/// Formats method documentation as Markdown for hover display.
pub fn format_method_hover(class_name: &str, method_name: &str, doc: &MethodDoc) -> String {
    [
        format!("### {class_name}.{method_name}"),
        String::new(),
        "```python".to_string(),
        doc.signature.to_string(),
        "```".to_string(),
        String::new(),
        doc.description.to_string(),
        String::new(),
        format!("**Returns:** {}", doc.returns),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{CLASSES, FUNCTIONS};

    #[test]
    fn documented_names_are_in_the_builtin_vocabulary() {
        for (name, _) in FUNCTION_DOCS {
            assert!(
                FUNCTIONS.contains(name) || CLASSES.contains_key(name),
                "{name} missing from the builtin tables"
            );
        }
        for (class, _) in METHOD_DOCS {
            assert!(CLASSES.contains_key(class), "{class} missing from CLASSES");
        }
    }

    #[test]
    fn lookup_by_name() {
        assert!(get_function_doc("factor").is_some());
        assert!(get_function_doc("no_such_function").is_none());
        assert!(get_method_doc("Matrix", "det").is_some());
        assert!(get_method_doc("Matrix", "no_such_method").is_none());
        assert!(get_method_doc("NoSuchClass", "det").is_none());
    }

    #[test]
    fn hover_markdown_contains_signature_params_and_examples() {
        let doc = get_function_doc("gcd").expect("gcd doc");
        let markdown = format_hover_markdown("gcd", doc);
        assert!(markdown.starts_with("### gcd"));
        assert!(markdown.contains("gcd(a, b=None)"));
        assert!(markdown.contains("**Parameters:**"));
        assert!(markdown.contains("(default: None)"));
        assert!(markdown.contains("**Returns:** integer"));
        assert!(markdown.contains("gcd(12, 18)  # 6"));
    }

    #[test]
    fn method_hover_markdown_names_the_class() {
        let doc = get_method_doc("Matrix", "LLL").expect("LLL doc");
        let markdown = format_method_hover("Matrix", "LLL", doc);
        assert!(markdown.starts_with("### Matrix.LLL"));
        assert!(markdown.contains("LLL(delta=0.99)"));
    }
}
