//! Bytecode-token opcodes
//!
//! The slice of the general token enumeration that the interpreter executes
//! directly. Values are fixed: the parser hands them through unchanged.

/// First token value that is also a bytecode
pub const FIRST_BYTECODE_TOKEN: i32 = 2;

/// Last token value that is also a bytecode
pub const LAST_BYTECODE_TOKEN: i32 = 83;

opcode_table! {
    /// Token opcodes, `FIRST_BYTECODE_TOKEN..=LAST_BYTECODE_TOKEN`
    pub enum Token {
        /// Push an object onto the scope chain (`with`)
        EnterWith = 2 => "ENTERWITH",
        /// Pop the scope pushed by `EnterWith`
        LeaveWith = 3 => "LEAVEWITH",
        /// Return the stack top
        Return = 4 => "RETURN",
        /// Unconditional jump
        Goto = 5 => "GOTO",
        /// Jump if the stack top is truthy
        IfEq = 6 => "IFEQ",
        /// Jump if the stack top is falsy
        IfNe = 7 => "IFNE",
        /// Assign to a bound name
        SetName = 8 => "SETNAME",
        /// `a | b`
        BitOr = 9 => "BITOR",
        /// `a ^ b`
        BitXor = 10 => "BITXOR",
        /// `a & b`
        BitAnd = 11 => "BITAND",
        /// `a == b`
        Eq = 12 => "EQ",
        /// `a != b`
        Ne = 13 => "NE",
        /// `a < b`
        Lt = 14 => "LT",
        /// `a <= b`
        Le = 15 => "LE",
        /// `a > b`
        Gt = 16 => "GT",
        /// `a >= b`
        Ge = 17 => "GE",
        /// `a << b`
        Lsh = 18 => "LSH",
        /// `a >> b`
        Rsh = 19 => "RSH",
        /// `a >>> b`
        Ursh = 20 => "URSH",
        /// `a + b`
        Add = 21 => "ADD",
        /// `a - b`
        Sub = 22 => "SUB",
        /// `a * b`
        Mul = 23 => "MUL",
        /// `a / b`
        Div = 24 => "DIV",
        /// `a % b`
        Mod = 25 => "MOD",
        /// `!a`
        Not = 26 => "NOT",
        /// `~a`
        BitNot = 27 => "BITNOT",
        /// `+a`
        Pos = 28 => "POS",
        /// `-a`
        Neg = 29 => "NEG",
        /// `new f(...)`
        New = 30 => "NEW",
        /// `delete o[k]`
        DelProp = 31 => "DELPROP",
        /// `typeof a`
        TypeOf = 32 => "TYPEOF",
        /// `o.k`
        GetProp = 33 => "GETPROP",
        /// `o.k` without missing-property warnings
        GetPropNoWarn = 34 => "GETPROPNOWARN",
        /// `o.k = v`
        SetProp = 35 => "SETPROP",
        /// `o[k]`
        GetElem = 36 => "GETELEM",
        /// `o[k] = v`
        SetElem = 37 => "SETELEM",
        /// `f(...)`
        Call = 38 => "CALL",
        /// Load a bound name
        Name = 39 => "NAME",
        /// Load a number constant
        Number = 40 => "NUMBER",
        /// Load a string constant
        String = 41 => "STRING",
        /// Load `null`
        Null = 42 => "NULL",
        /// Load `this`
        This = 43 => "THIS",
        /// Load `false`
        False = 44 => "FALSE",
        /// Load `true`
        True = 45 => "TRUE",
        /// `a === b`
        ShallowEq = 46 => "SHEQ",
        /// `a !== b`
        ShallowNe = 47 => "SHNE",
        /// Regular expression literal
        RegExp = 48 => "REGEXP",
        /// Resolve the scope that owns a name
        BindName = 49 => "BINDNAME",
        /// `throw a`
        Throw = 50 => "THROW",
        /// Rethrow the exception held by a catch scope
        Rethrow = 51 => "RETHROW",
        /// `k in o`
        In = 52 => "IN",
        /// `a instanceof C`
        InstanceOf = 53 => "INSTANCEOF",
        /// Load a frame-local slot
        LocalLoad = 54 => "LOCAL_LOAD",
        /// Load a variable
        GetVar = 55 => "GETVAR",
        /// Store a variable
        SetVar = 56 => "SETVAR",
        /// Create a catch scope
        CatchScope = 57 => "CATCH_SCOPE",
        /// Start `for-in` key enumeration
        EnumInitKeys = 58 => "ENUM_INIT_KEYS",
        /// Start `for-each` value enumeration
        EnumInitValues = 59 => "ENUM_INIT_VALUES",
        /// Start destructuring enumeration
        EnumInitArray = 60 => "ENUM_INIT_ARRAY",
        /// Start `for-of` iteration
        EnumInitValuesInOrder = 61 => "ENUM_INIT_VALUES_IN_ORDER",
        /// Advance an enumeration
        EnumNext = 62 => "ENUM_NEXT",
        /// Current enumeration id
        EnumId = 63 => "ENUM_ID",
        /// Load the running function
        ThisFn = 64 => "THISFN",
        /// Return the previously stored result
        ReturnResult = 65 => "RETURN_RESULT",
        /// Array literal
        ArrayLit = 66 => "ARRAYLIT",
        /// Object literal
        ObjectLit = 67 => "OBJECTLIT",
        /// Read through a reference
        GetRef = 68 => "GET_REF",
        /// Write through a reference
        SetRef = 69 => "SET_REF",
        /// Delete through a reference
        DelRef = 70 => "DEL_REF",
        /// Call producing a reference
        RefCall = 71 => "REF_CALL",
        /// Reference to a special property such as `__proto__`
        RefSpecial = 72 => "REF_SPECIAL",
        /// `yield a`
        Yield = 73 => "YIELD",
        /// Strict-mode name assignment
        StrictSetName = 74 => "STRICT_SETNAME",
        /// `a ** b`
        Exp = 75 => "EXP",
        /// `default xml namespace = a`
        DefaultNamespace = 76 => "DEFAULTNAMESPACE",
        /// Escape an XML attribute value
        EscXmlAttr = 77 => "ESCXMLATTR",
        /// Escape XML text
        EscXmlText = 78 => "ESCXMLTEXT",
        /// XML member reference
        RefMember = 79 => "REF_MEMBER",
        /// Namespaced XML member reference
        RefNsMember = 80 => "REF_NS_MEMBER",
        /// XML name reference
        RefName = 81 => "REF_NAME",
        /// Namespaced XML name reference
        RefNsName = 82 => "REF_NS_NAME",
        /// Load a BigInt constant
        BigInt = 83 => "BIGINT",
    }
}
