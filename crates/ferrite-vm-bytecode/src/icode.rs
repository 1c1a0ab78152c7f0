//! Extended (interpreter-only) opcodes
//!
//! Numbered from `0` downwards without gaps. Adding an opcode means
//! appending it below the current last entry and moving [`MIN_ICODE`].

/// The most negative extended opcode
pub const MIN_ICODE: i32 = -86;

opcode_table! {
    /// Extended opcodes, `MIN_ICODE..=0`
    pub enum Icode {
        /// Delete a bound name
        DelName = 0 => "DELNAME",
        /// Duplicate the stack top
        Dup = -1 => "DUP",
        /// Duplicate the top two stack values
        Dup2 = -2 => "DUP2",
        /// Swap the top two stack values
        Swap = -3 => "SWAP",
        /// Discard the stack top
        Pop = -4 => "POP",
        /// Move the stack top into the result register
        PopResult = -5 => "POP_RESULT",
        /// Conditional jump that also pops an extra value
        IfEqPop = -6 => "IFEQ_POP",
        /// `++`/`--` on a variable
        VarIncDec = -7 => "VAR_INC_DEC",
        /// `++`/`--` on a bound name
        NameIncDec = -8 => "NAME_INC_DEC",
        /// `++`/`--` on a named property
        PropIncDec = -9 => "PROP_INC_DEC",
        /// `++`/`--` on a computed property
        ElemIncDec = -10 => "ELEM_INC_DEC",
        /// `++`/`--` through a reference
        RefIncDec = -11 => "REF_INC_DEC",
        /// Restore the scope from a local
        ScopeLoad = -12 => "SCOPE_LOAD",
        /// Save the scope into a local
        ScopeSave = -13 => "SCOPE_SAVE",
        /// `typeof name` without a ReferenceError
        TypeOfName = -14 => "TYPEOFNAME",
        /// Callee and receiver from a name
        NameAndThis = -15 => "NAME_AND_THIS",
        /// Callee and receiver from a named property
        PropAndThis = -16 => "PROP_AND_THIS",
        /// Callee and receiver from a computed property
        ElemAndThis = -17 => "ELEM_AND_THIS",
        /// Callee and receiver from a value
        ValueAndThis = -18 => "VALUE_AND_THIS",
        /// Optional-chaining variant of `NameAndThis`
        NameAndThisOptional = -19 => "NAME_AND_THIS_OPTIONAL",
        /// Optional-chaining variant of `PropAndThis`
        PropAndThisOptional = -20 => "PROP_AND_THIS_OPTIONAL",
        /// Optional-chaining variant of `ElemAndThis`
        ElemAndThisOptional = -21 => "ELEM_AND_THIS_OPTIONAL",
        /// Optional-chaining variant of `ValueAndThis`
        ValueAndThisOptional = -22 => "VALUE_AND_THIS_OPTIONAL",
        /// Function expression closure
        ClosureExpr = -23 => "CLOSURE_EXPR",
        /// Function declaration closure
        ClosureStmt = -24 => "CLOSURE_STMT",
        /// Call that may be `eval` or `With`
        CallSpecial = -25 => "CALLSPECIAL",
        /// Optional-chaining variant of `CallSpecial`
        CallSpecialOptional = -26 => "CALLSPECIAL_OPTIONAL",
        /// Return `undefined`
        RetUndef = -27 => "RETUNDEF",
        /// Enter a `finally` subroutine
        Gosub = -28 => "GOSUB",
        /// Start of a `finally` subroutine
        StartSub = -29 => "STARTSUB",
        /// Leave a `finally` subroutine
        RetSub = -30 => "RETSUB",
        /// Source line change
        Line = -31 => "LINE",
        /// Inline 16-bit integer
        ShortNumber = -32 => "SHORTNUMBER",
        /// Inline 32-bit integer
        IntNumber = -33 => "INTNUMBER",
        /// Start an object literal
        LiteralNewObject = -34 => "LITERAL_NEW_OBJECT",
        /// Start an array literal
        LiteralNewArray = -35 => "LITERAL_NEW_ARRAY",
        /// Store one literal element
        LiteralSet = -36 => "LITERAL_SET",
        /// Record the home object of a method
        FnStoreHomeObject = -37 => "FN_STORE_HOME_OBJECT",
        /// Array literal with holes
        SparseArrayLit = -38 => "SPARE_ARRAYLIT",
        /// Index register = 0
        RegIndC0 = -39 => "REG_IND_C0",
        /// Index register = 1
        RegIndC1 = -40 => "REG_IND_C1",
        /// Index register = 2
        RegIndC2 = -41 => "REG_IND_C2",
        /// Index register = 3
        RegIndC3 = -42 => "REG_IND_C3",
        /// Index register = 4
        RegIndC4 = -43 => "REG_IND_C4",
        /// Index register = 5
        RegIndC5 = -44 => "REG_IND_C5",
        /// Index register from a 1-byte operand
        RegInd1 = -45 => "LOAD_IND1",
        /// Index register from a 2-byte operand
        RegInd2 = -46 => "LOAD_IND2",
        /// Index register from a 4-byte operand
        RegInd4 = -47 => "LOAD_IND4",
        /// String register = string 0
        RegStrC0 = -48 => "REG_STR_C0",
        /// String register = string 1
        RegStrC1 = -49 => "REG_STR_C1",
        /// String register = string 2
        RegStrC2 = -50 => "REG_STR_C2",
        /// String register = string 3
        RegStrC3 = -51 => "REG_STR_C3",
        /// String register from a 1-byte operand
        RegStr1 = -52 => "LOAD_STR1",
        /// String register from a 2-byte operand
        RegStr2 = -53 => "LOAD_STR2",
        /// String register from a 4-byte operand
        RegStr4 = -54 => "LOAD_STR4",
        /// Load a variable by inline index
        GetVar1 = -55 => "GETVAR1",
        /// Store a variable by inline index
        SetVar1 = -56 => "SETVAR1",
        /// Push `undefined`
        Undef = -57 => "UNDEF",
        /// Push `0`
        Zero = -58 => "ZERO",
        /// Push `1`
        One = -59 => "ONE",
        /// Enter an XML filter `.()`
        EnterDq = -60 => "ENTERDQ",
        /// Leave an XML filter `.()`
        LeaveDq = -61 => "LEAVEDQ",
        /// Call in tail position
        TailCall = -62 => "TAIL_CALL",
        /// Clear a local so its referent can be collected
        LocalClear = -63 => "LOCAL_CLEAR",
        /// Getter in an object literal
        LiteralGetter = -64 => "LITERAL_GETTER",
        /// Setter in an object literal
        LiteralSetter = -65 => "LITERAL_SETTER",
        /// Initialize a `const` name
        SetConst = -66 => "SETCONST",
        /// Initialize a `const` variable
        SetConstVar = -67 => "SETCONSTVAR",
        /// Initialize a `const` variable by inline index
        SetConstVar1 = -68 => "SETCONSTVAR1",
        /// Generator prologue: suspend before the first statement
        Generator = -69 => "GENERATOR",
        /// Generator body finished
        GeneratorEnd = -70 => "GENERATOR_END",
        /// `debugger` statement
        Debugger = -71 => "DEBUGGER",
        /// `return` inside a generator body
        GeneratorReturn = -72 => "GENERATOR_RETURN",
        /// `yield*` delegation to an inner iterable
        YieldStar = -73 => "YIELD_STAR",
        /// BigInt register = constant 0
        RegBigIntC0 = -74 => "REG_BIGINT_C0",
        /// BigInt register = constant 1
        RegBigIntC1 = -75 => "REG_BIGINT_C1",
        /// BigInt register = constant 2
        RegBigIntC2 = -76 => "REG_BIGINT_C2",
        /// BigInt register = constant 3
        RegBigIntC3 = -77 => "REG_BIGINT_C3",
        /// BigInt register from a 1-byte operand
        RegBigInt1 = -78 => "LOAD_BIGINT1",
        /// BigInt register from a 2-byte operand
        RegBigInt2 = -79 => "LOAD_BIGINT2",
        /// BigInt register from a 4-byte operand
        RegBigInt4 = -80 => "LOAD_BIGINT4",
        /// Tagged template call-site object
        TemplateLiteralCallSite = -81 => "TEMPLATE_LITERAL_CALLSITE",
        /// Store a computed key in an object literal
        LiteralKeySet = -82 => "LITERAL_KEY_SET",
        /// Jump if the stack top is `null` or `undefined`
        IfNullUndef = -83 => "IF_NULL_UNDEF",
        /// Jump unless the stack top is `null` or `undefined`
        IfNotNullUndef = -84 => "IF_NOT_NULL_UNDEF",
        /// `super.m(...)`
        CallOnSuper = -85 => "CALL_ON_SUPER",
        /// `delete super.k`
        DelPropSuper = -86 => "DELPROP_SUPER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icodes_descend_without_gaps() {
        assert_eq!(Icode::ALL.len(), (1 - MIN_ICODE) as usize);
        for (offset, icode) in Icode::ALL.iter().enumerate() {
            assert_eq!(icode.raw(), -(offset as i32));
        }
        assert_eq!(Icode::ALL.last().map(|i| i.raw()), Some(MIN_ICODE));
    }

    #[test]
    fn test_icode_decode() {
        assert_eq!(Icode::from_raw(0), Some(Icode::DelName));
        assert_eq!(Icode::from_raw(MIN_ICODE), Some(Icode::DelPropSuper));
        assert_eq!(Icode::from_raw(MIN_ICODE - 1), None);
        assert_eq!(Icode::from_raw(1), None);
        assert_eq!(Icode::RegInd1.name(), "LOAD_IND1");
    }
}
