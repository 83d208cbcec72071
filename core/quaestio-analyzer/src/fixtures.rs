//! Annotation snippets shared by the unit tests.

use quaestio_conllu::parse_sentences;
use quaestio_semgraph::DependencyGraph;

pub const WANN_KOMMST_DU: &str = "\
# sent_id = 1
# text = Wann kommst du?
1\tWann\twann\tADV\tPWAV\t_\t2\tmo\t_\t_
2\tkommst\tkommen\tVERB\tVVFIN\tPerson=2|Number=Sing\t0\troot\t_\t_
3\tdu\tdu\tPRON\tPPER\tCase=Nom|Person=2\t2\tsb\t_\tSpaceAfter=No
4\t?\t?\tPUNCT\t$.\t_\t2\tpunct\t_\t_
";

pub const DU_KOMMST: &str = "\
1\tDu\tdu\tPRON\tPPER\t_\t2\tsb\t_\t_
2\tkommst\tkommen\tVERB\tVVFIN\t_\t0\troot\t_\tSpaceAfter=No
3\t.\t.\tPUNCT\t$.\t_\t2\tpunct\t_\t_
";

/// Auxiliary verb: coarse tag `AUX`, fine tag `VAFIN`.
pub const IST_ER_DA: &str = "\
1\tIst\tsein\tAUX\tVAFIN\t_\t0\troot\t_\t_
2\ter\ter\tPRON\tPPER\t_\t1\tsb\t_\t_
3\tda\tda\tADV\tADV\t_\t1\tmo\t_\tSpaceAfter=No
4\t?\t?\tPUNCT\t$.\t_\t1\tpunct\t_\t_
";

pub const HALLO: &str = "\
1\tHallo\thallo\tINTJ\tITJ\t_\t0\troot\t_\tSpaceAfter=No
2\t!\t!\tPUNCT\t$.\t_\t1\tpunct\t_\t_
";

pub const ER_SAGT_KOMMST_DU: &str = "\
1\tEr\ter\tPRON\tPPER\t_\t2\tsb\t_\t_
2\tsagt\tsagen\tVERB\tVVFIN\t_\t0\troot\t_\tSpaceAfter=No
3\t,\t,\tPUNCT\t$,\t_\t2\tpunct\t_\t_
4\tkommst\tkommen\tVERB\tVVFIN\t_\t2\toc\t_\t_
5\tdu\tdu\tPRON\tPPER\t_\t4\tsb\t_\t_
";

/// `du` is the subject of `Komm` only through the secondary-edges column.
pub const SECONDARY_SUBJECT: &str = "\
1\tKomm\tkommen\tVERB\tVVIMP\t_\t0\troot\t_\tSpaceAfter=No
2\t,\t,\tPUNCT\t$,\t_\t1\tpunct\t_\t_
3\tdu\tdu\tPRON\tPPER\t_\t1\tvok\t1:sb\tSpaceAfter=No
4\t!\t!\tPUNCT\t$.\t_\t1\tpunct\t_\t_
";

pub const WIE_VIELE: &str = "\
1\tWie\twie\tADV\tPWAV\t_\t2\tmo\t_\t_
2\tviele\tviel\tPRON\tPIAT\t_\t3\tsb\t_\t_
3\tkommen\tkommen\tVERB\tVVFIN\t_\t0\troot\t_\tSpaceAfter=No
4\t?\t?\tPUNCT\t$.\t_\t3\tpunct\t_\t_
";

/// The first sentence of `conllu`, which must be well formed.
pub fn graph(conllu: &str) -> DependencyGraph {
    parse_sentences(conllu)
        .next()
        .expect("fixture holds a sentence")
        .expect("fixture is well formed")
}
