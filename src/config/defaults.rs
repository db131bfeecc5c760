//! Compiled-in crawl targets

/// Documentation sites crawled when no config file overrides the list
pub const SOURCE_DOMAINS: &[&str] = &[
    "bower.io", "cfdocs.org", "clojure.org", "clojuredocs.org", "codecept.io",
    "codeception.com", "codeigniter.com", "coffeescript.org", "cran.r-project.org",
    "crystal-lang.org", "forum.crystal-lang.org", "css-tricks.com", "dart.dev",
    "dev.mysql.com", "developer.apple.com", "developer.mozilla.org",
    "angular.io", "api.drupal.org", "api.haxe.org", "api.qunitjs.com", "babeljs.io",
    "backbonejs.org", "bazel.build", "bluebirdjs.com",
    "developer.wordpress.org", "doc.deno.land", "doc.rust-lang.org", "docs.astro.build",
    "docs.aws.amazon.com", "docs.brew.sh", "docs.chef.io", "docs.cypress.io",
    "docs.influxdata.com", "docs.julialang.org", "docs.microsoft.com", "docs.npmjs.com",
    "docs.oracle.com", "docs.phalconphp.com", "docs.python.org", "docs.rs",
    "docs.ruby-lang.org", "docs.saltproject.io", "docs.wagtail.org", "doctrine-project.org",
    "docwiki.embarcadero.com", "eigen.tuxfamily.org", "elixir-lang.org", "elm-lang.org",
    "en.cppreference.com", "enzymejs.github.io", "erights.org", "erlang.org",
    "esbuild.github.io", "eslint.org", "expressjs.com", "fastapi.tiangolo.com",
    "flow.org", "fortran90.org", "fsharp.org", "getbootstrap.com", "getcomposer.org",
    "git-scm.com", "gnu.org", "gnucobol.sourceforge.io",
    "go.dev", "golang.org", "graphite.readthedocs.io", "groovy-lang.org", "gruntjs.com",
    "handlebarsjs.com", "haskell.org", "hex.pm",
    "hexdocs.pm", "httpd.apache.org", "i3wm.org", "jasmine.github.io", "javascript.info",
    "jekyllrb.com", "jsdoc.app", "julialang.org",
    "knockoutjs.com", "kotlinlang.org", "laravel.com", "latexref.xyz", "learn.microsoft.com",
    "lesscss.org", "love2d.org", "lua.org",
    "man7.org", "mariadb.com", "mochajs.org", "modernizr.com", "momentjs.com",
    "mongoosejs.com", "next.router.vuejs.org", "next.vuex.vuejs.org",
    "nginx.org", "nim-lang.org", "nixos.org", "nodejs.org", "npmjs.com", "ocaml.org",
    "odin-lang.org", "openjdk.java.net",
    "opentsdb.net", "perldoc.perl.org", "php.net", "playwright.dev", "pointclouds.org",
    "postgresql.org", "prettier.io", "pugjs.org",
    "pydata.org", "pytorch.org", "qt.io", "r-project.org", "react-bootstrap.github.io",
    "reactivex.io", "reactjs.org",
    "reactnative.dev", "reactrouterdotcom.fly.dev", "readthedocs.io", "readthedocs.org",
    "redis.io", "redux.js.org", "requirejs.org", "rethinkdb.com",
    "ruby-doc.org", "ruby-lang.org", "rust-lang.org", "rxjs.dev", "sass-lang.com",
    "scala-lang.org", "scikit-image.org", "scikit-learn.org",
    "spring.io", "sqlite.org", "stdlib.ponylang.io", "superuser.com", "svelte.dev",
    "swift.org", "tailwindcss.com", "twig.symfony.com",
    "typescriptlang.org", "underscorejs.org", "vitejs.dev", "vitest.dev", "vuejs.org",
    "vueuse.org", "webpack.js.org", "wiki.archlinux.org",
    "www.chaijs.com", "www.electronjs.org", "www.gnu.org", "www.hammerspoon.org",
    "www.khronos.org", "www.lua.org", "www.php.net/manual/en/", "www.pygame.org",
    "www.rubydoc.info", "www.statsmodels.org", "www.tcl.tk", "www.terraform.io",
    "www.vagrantup.com", "www.yiiframework.com", "yarnpkg.com",
];

/// Binary, image and archive formats that carry no indexable text
// TODO: parse PDFs into text instead of skipping them.
pub const BLACKLISTED_EXTENSIONS: &[&str] = &[
    ".jpg", ".png", ".xz", ".bz2", ".asc", ".svg", ".eps", ".phar", ".pdf", ".psd",
];
