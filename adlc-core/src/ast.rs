//! Unresolved module AST — the shape produced by the parser, before name
//! and type resolution.
//!
//! Every node keeps a [`Loc`] for diagnostics. Identifiers and scoped names
//! are owned `String`s rather than borrowed slices: the compiler is
//! short-lived and single-pass (§5), so the simplicity of owned data
//! outweighs the cost of the extra allocations.

use indexmap::IndexMap;

use crate::map::Located;
use crate::nom_tools::Loc;

pub type Identifier = String;

/// Dotted module path, e.g. `foo.bar.baz`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleName(pub Vec<Identifier>);

impl ModuleName {
    pub fn new(parts: Vec<Identifier>) -> Self {
        Self(parts)
    }

    pub fn parse(dotted: &str) -> Self {
        Self(dotted.split('.').map(|s| s.to_string()).collect())
    }

    pub fn dotted(&self) -> String {
        self.0.join(".")
    }

    /// Filesystem-relative path for this module, e.g. `foo/bar/baz.adl`.
    pub fn relative_path(&self) -> std::path::PathBuf {
        let mut path = std::path::PathBuf::new();
        for (i, part) in self.0.iter().enumerate() {
            if i + 1 == self.0.len() {
                path.push(format!("{part}.adl"));
            } else {
                path.push(part);
            }
        }
        path
    }
}

impl std::fmt::Display for ModuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// (module, decl name) pair, globally unique for any declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopedName {
    pub module: ModuleName,
    pub name: Identifier,
}

impl ScopedName {
    pub fn new(module: ModuleName, name: impl Into<Identifier>) -> Self {
        Self { module, name: name.into() }
    }

    /// Parses a fully dotted scoped name, e.g. `sys.annotations.Doc`: the
    /// last segment is the declaration name, everything before it is the
    /// module path.
    pub fn parse(dotted: &str) -> Self {
        let mut parts: Vec<Identifier> = dotted.split('.').map(|s| s.to_string()).collect();
        let name = parts.pop().unwrap_or_default();
        Self { module: ModuleName::new(parts), name }
    }
}

impl std::fmt::Display for ScopedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

/// Intrinsic primitive types, with their fixed arity (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumString)]
pub enum Primitive {
    Void,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Word8,
    Word16,
    Word32,
    Word64,
    Float,
    Double,
    String,
    Bytes,
    Vector,
    StringMap,
    Nullable,
    Json,
    TypeToken,
}

impl Primitive {
    pub fn arity(self) -> usize {
        match self {
            Primitive::Vector | Primitive::StringMap | Primitive::Nullable => 1,
            _ => 0,
        }
    }

    pub fn all() -> &'static [Primitive] {
        use Primitive::*;
        &[
            Void, Bool, Int8, Int16, Int32, Int64, Word8, Word16, Word32, Word64, Float, Double,
            String, Bytes, Vector, StringMap, Nullable, Json, TypeToken,
        ]
    }

    pub fn from_name(name: &str) -> Option<Primitive> {
        name.parse().ok()
    }
}

/// The head of a type expression, before resolution: a bare word that may
/// turn out to be a primitive, a type parameter, or a reference once the
/// resolver runs (§3, §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHead {
    /// Not yet resolved: a bare identifier or dotted scoped name as written.
    Unresolved { path: Vec<Identifier> },
    /// Resolved forms, produced only by the resolver (§3 invariant: every
    /// `TypeRef` in a resolved module is one of these three).
    Primitive(Primitive),
    TypeParam(Identifier),
    Reference(ScopedName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    pub head: TypeHead,
    pub parameters: Vec<TypeExpr>,
    pub loc: Loc,
}

impl TypeExpr {
    pub fn unresolved(path: Vec<Identifier>, parameters: Vec<TypeExpr>, loc: Loc) -> Self {
        Self { head: TypeHead::Unresolved { path }, parameters, loc }
    }
}

/// A JSON-shaped literal value (§3): used for default values and for
/// annotation values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    /// Exact decimal text as written in source, preserved verbatim; callers
    /// that need a numeric value parse it on demand (§4.1).
    Number(String),
    Str(String),
    Array(Vec<Literal>),
    Object(IndexMap<String, Literal>),
}

impl Literal {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Number(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Number(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn is_integral(&self) -> bool {
        match self {
            Literal::Number(text) => !text.contains(['.', 'e', 'E']),
            _ => false,
        }
    }
}

/// Annotation map: ScopedName keys are unique (§3 invariant 5).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// Keyed by the dotted scoped name text as written in source
    /// (`sys.annotations.Doc`, `adlc.config.java.JavaTable`, ...);
    /// resolved to a real `ScopedName` lazily when a backend asks for it.
    entries: IndexMap<String, (ScopedName, Literal)>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scoped_name: ScopedName, value: Literal) -> Option<Literal> {
        let key = scoped_name.to_string();
        self.entries.insert(key, (scoped_name, value)).map(|(_, v)| v)
    }

    pub fn get(&self, scoped_name: &ScopedName) -> Option<&Literal> {
        self.entries.get(&scoped_name.to_string()).map(|(_, v)| v)
    }

    pub fn get_by_dotted(&self, dotted: &str) -> Option<&Literal> {
        self.entries.get(dotted).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScopedName, &Literal)> {
        self.entries.values().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Identifier,
    pub type_expr: TypeExpr,
    pub default: Option<Literal>,
    pub annotations: Annotations,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructBody {
    pub type_params: Vec<Identifier>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionBody {
    pub type_params: Vec<Identifier>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefBody {
    pub type_params: Vec<Identifier>,
    pub type_expr: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTypeBody {
    pub type_params: Vec<Identifier>,
    pub type_expr: TypeExpr,
    pub default: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclBody {
    Struct(StructBody),
    Union(UnionBody),
    TypeDef(TypeDefBody),
    NewType(NewTypeBody),
}

impl DeclBody {
    pub fn type_params(&self) -> &[Identifier] {
        match self {
            DeclBody::Struct(s) => &s.type_params,
            DeclBody::Union(u) => &u.type_params,
            DeclBody::TypeDef(t) => &t.type_params,
            DeclBody::NewType(n) => &n.type_params,
        }
    }

    pub fn arity(&self) -> usize {
        self.type_params().len()
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            DeclBody::Struct(s) => &s.fields,
            DeclBody::Union(u) => &u.fields,
            DeclBody::TypeDef(_) | DeclBody::NewType(_) => &[],
        }
    }

    pub fn fields_mut(&mut self) -> &mut [Field] {
        match self {
            DeclBody::Struct(s) => &mut s.fields,
            DeclBody::Union(u) => &mut u.fields,
            DeclBody::TypeDef(_) | DeclBody::NewType(_) => &mut [],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: Identifier,
    pub version: Option<u32>,
    pub body: DeclBody,
    pub annotations: Annotations,
    pub loc: Loc,
}

impl Located for Decl {
    fn loc(&self) -> &Loc {
        &self.loc
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Import {
    /// `import foo.bar.*;` — every decl in the module is exposed.
    WholeModule(ModuleName),
    /// `import foo.bar.Baz;` — exactly one decl is exposed.
    Scoped(ScopedName),
}

/// An unresolved module: the direct output of the parser for one `.adl`
/// file (§3).
///
/// `decls` is positional and may contain duplicate names — detecting that
/// is the resolver's job (§4.4 step 1), not the parser's.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: ModuleName,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
    pub source: crate::file::SourceFile,
}

impl Module {
    pub fn decls_in_order(&self) -> impl Iterator<Item = &Decl> {
        self.decls.iter()
    }

    pub fn find_decl(&self, name: &str) -> Option<&Decl> {
        self.decls.iter().find(|d| d.name == name)
    }

    pub fn find_decl_mut(&mut self, name: &str) -> Option<&mut Decl> {
        self.decls.iter_mut().find(|d| d.name == name)
    }
}
