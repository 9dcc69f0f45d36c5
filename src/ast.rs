use crate::lexer::TokenKind;
use crate::value::Value;

/// A function or method definition: shared by `fun` declarations, class
/// methods and trait methods. The body is reference-counted because closures
/// and bound methods keep it alive past the declaration statement.
#[derive(Debug, Clone)]
pub(crate) struct FunctionDecl {
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
    pub(crate) body: std::rc::Rc<Vec<Stmt>>,
    pub(crate) line: usize,
}

/// Expressions. `Var`, `Assign`, `This` and `Super` carry a parser-assigned
/// `id` that the resolver keys its binding table on — one lexical slot per
/// name occurrence.
#[derive(Debug, Clone)]
pub(crate) enum Expr {
    Literal(Value),
    Var {
        name: String,
        id: usize,
        line: usize,
    },
    Assign {
        name: String,
        id: usize,
        expr: Box<Expr>,
        line: usize,
    },
    Unary {
        op: TokenKind,
        expr: Box<Expr>,
        line: usize,
    },
    Binary {
        left: Box<Expr>,
        op: TokenKind,
        right: Box<Expr>,
        line: usize,
    },
    Logical {
        left: Box<Expr>,
        op: TokenKind,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        line: usize,
    },
    Get {
        target: Box<Expr>,
        name: String,
        line: usize,
    },
    Set {
        target: Box<Expr>,
        name: String,
        value: Box<Expr>,
        line: usize,
    },
    This {
        id: usize,
        line: usize,
    },
    Super {
        method: String,
        id: usize,
        line: usize,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum Stmt {
    Expr(Expr),
    Print(Expr),
    VarDecl {
        name: String,
        init: Option<Expr>,
        line: usize,
    },
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    FunDecl(FunctionDecl),
    Return {
        expr: Option<Expr>,
        line: usize,
    },
    /// `class Name [< Superclass] [with T1, T2] { methods }`
    ClassDecl {
        name: String,
        superclass: Option<Expr>,
        traits: Vec<Expr>,
        methods: Vec<FunctionDecl>,
        line: usize,
    },
    /// `trait Name [with T1, T2] { methods }`
    TraitDecl {
        name: String,
        traits: Vec<Expr>,
        methods: Vec<FunctionDecl>,
        line: usize,
    },
}
