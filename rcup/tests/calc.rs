mod common;

use common::read;
use rcup::grammar::CodeKind;
use rcup::{ErrorSink, ProductionPart, SymbolId, SymbolKind};

const CALC: &str = "
    package calc ;
    import java_cup . runtime . * ;
    import java . util . HashMap ;

    action code {:HashMap<String,Integer>vars;:}
    parser code {:report_error(){}:}
    init with {:vars=new_map();:}
    scan with {:return_scanner.next_token();:}

    terminal SEMI , PLUS , MINUS , TIMES , DIVIDE , UMINUS , LPAREN , RPAREN ;
    terminal java . lang . Integer NUMBER ;
    terminal String ID ;
    non terminal expr_list , expr_part ;
    non terminal Integer expr , term , factor ;

    start with expr_list ;

    expr_list ::= expr_list expr_part | expr_part ;
    expr_part ::= expr : e {:print(e);:} SEMI ;
    expr ::= expr : l PLUS term : r {:RESULT=l+r;:}
           | expr : l MINUS term : r {:RESULT=l-r;:}
           | term : t {:RESULT=t;:}
           ;
    term ::= term : l TIMES factor : r {:RESULT=l*r;:}
           | term : l DIVIDE factor : r {:RESULT=l/r;:}
           | factor : f {:RESULT=f;:}
           ;
    factor ::= NUMBER : n {:RESULT=n;:}
             | ID : i {:RESULT=vars.get(i);:}
             | LPAREN expr : e RPAREN {:RESULT=e;:}
             | MINUS factor : f {:RESULT=-f;:}
             | error
             ;
";

#[test]
fn calc_reads_cleanly() {
    let (g, d) = read("calc", CALC);
    assert_eq!(d.error_count(), 0);
    assert_eq!(d.warnings(), &["terminal 'UMINUS' is declared but never used".to_string()]);

    assert_eq!(g.package(), "calc");
    assert_eq!(
        g.imports(),
        &["java_cup.runtime.*".to_string(), "java.util.HashMap".to_string()]
    );
    assert_eq!(g.code(CodeKind::Action), Some("HashMap<String,Integer>vars;"));
    assert_eq!(g.code(CodeKind::Scan), Some("return_scanner.next_token();"));
    assert_eq!(g.debug_hook(), None);
}

#[test]
fn calc_symbols() {
    let (g, _) = read("calc", CALC);
    let symbols = g.symbols();

    assert_eq!(symbols.declared_len(), 15);
    assert_eq!(symbols.nterminals(), 10 + 2); // declared, plus EOF and error
    assert_eq!(g.non_terminals().len(), 5);

    let number = symbols.get(symbols.lookup("NUMBER").unwrap());
    assert_eq!(number.kind, SymbolKind::Terminal);
    assert_eq!(number.ty.as_deref(), Some("java.lang.Integer"));

    let expr_list = symbols.get(symbols.lookup("expr_list").unwrap());
    assert_eq!(expr_list.kind, SymbolKind::NonTerminal);
    assert_eq!(expr_list.ty, None);

    assert_eq!(symbols.lookup("error"), Some(SymbolId::ERROR));
    assert_eq!(symbols.lookup("$START"), None);
    assert_eq!(symbols.lookup("EOF"), None);
}

#[test]
fn calc_productions() {
    let (g, _) = read("calc", CALC);
    assert_eq!(g.productions().len(), 14);

    let strings: Vec<String> = g
        .productions()
        .iter()
        .map(|p| g.production_to_string(p))
        .collect();
    assert_eq!(strings[0], "expr_list ::= expr_list expr_part");
    assert_eq!(strings[2], "expr_part ::= expr:e {:print(e);:} SEMI");
    assert_eq!(strings[13], "factor ::= error");

    for (i, p) in g.productions().iter().enumerate() {
        assert_eq!(p.index().index(), i);
    }

    let factor = g.symbols().lookup("factor").unwrap();
    let alternatives: Vec<usize> = g
        .productions_for(factor)
        .map(|p| p.index().index())
        .collect();
    assert_eq!(alternatives, vec![9, 10, 11, 12, 13]);

    // An action in the middle of a production is a part like any other.
    let expr_part = &g.productions()[2];
    assert!(expr_part.parts()[1].is_action());
    assert_eq!(expr_part.trailing_action(), None);
    assert_eq!(expr_part.rhs_symbols().count(), 2);

    let factor_paren = &g.productions()[11];
    assert_eq!(
        factor_paren.parts()[1],
        ProductionPart::Symbol {
            symbol: g.symbols().lookup("expr").unwrap(),
            label: Some("e".to_string()),
        }
    );
}

#[test]
fn calc_start() {
    let (g, _) = read("calc", CALC);
    let start = g.start_production().unwrap();
    assert_eq!(start.lhs(), SymbolId::START);
    assert_eq!(start.rhs(), [g.symbols().lookup("expr_list").unwrap(), SymbolId::EOF]);
    assert_eq!(g.start_production_to_string().unwrap(), "$START ::= expr_list EOF");
}
