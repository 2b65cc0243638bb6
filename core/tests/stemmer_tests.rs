use vsearch_core::stemmer::stem;

#[test]
fn classic_vocabulary() {
    let cases = [
        ("sensational", "sensat"),
        ("rational", "ration"),
        ("formaliti", "formal"),
        ("sensitiviti", "sensit"),
        ("triplicate", "triplic"),
        ("electriciti", "electr"),
        ("electrical", "electr"),
        ("revival", "reviv"),
        ("allowance", "allow"),
        ("inference", "infer"),
        ("airliner", "airlin"),
        ("gyroscopic", "gyroscop"),
        ("defensible", "defens"),
        ("irritant", "irrit"),
        ("replacement", "replac"),
        ("dependent", "depend"),
        ("homologou", "homolog"),
        ("communism", "commun"),
        ("activate", "activ"),
        ("angulariti", "angular"),
        ("homologous", "homolog"),
        ("effective", "effect"),
        ("bowdlerize", "bowdler"),
        ("cease", "ceas"),
        ("filing", "file"),
        ("hopping", "hop"),
        ("tanned", "tan"),
        ("falling", "fall"),
        ("hissing", "hiss"),
        ("fizzed", "fizz"),
        ("failing", "fail"),
        ("sky", "sky"),
        ("conflated", "conflat"),
        ("troubled", "troubl"),
        ("sized", "size"),
    ];
    for (word, expected) in cases {
        assert_eq!(stem(word), expected, "stem({word})");
    }
}

#[test]
fn stemmed_roots_are_stable() {
    for root in ["cat", "dog", "run", "hop", "tree", "search", "engin", "index", "rank", "queri"] {
        assert_eq!(stem(root), root, "stem({root})");
    }
}
